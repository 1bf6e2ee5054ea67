//! One-shot commands that read a request from a JSON file: `prompt` prints
//! the prompt that would be sent, `generate` runs the whole pipeline.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use lessonplan_core::{GeminiClient, GeminiConfig, GenerationRequest, LessonPlanner, build_prompt};

/// Read a generation request from a JSON file.
pub fn read_request(path: &Path) -> Result<GenerationRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse request file {}", path.display()))
}

/// Render the prompt for the request in `path`.
pub fn render_prompt(path: &Path) -> Result<String> {
    let req = read_request(path)?;
    Ok(build_prompt(&req))
}

pub fn run_prompt(path: &Path) -> Result<()> {
    println!("{}", render_prompt(path)?);
    Ok(())
}

/// Generate a plan for the request in `path` and print it, or write it to
/// `output` when given.
pub async fn run_generate(path: &Path, output: Option<&Path>, gemini: GeminiConfig) -> Result<()> {
    let req = read_request(path)?;
    let client = GeminiClient::new(gemini).context("failed to build generation client")?;
    let planner = LessonPlanner::new(Arc::new(client));

    let plan = planner
        .generate(&req)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("lesson plan generation failed")?;
    let rendered = serde_json::to_string_pretty(&plan)?;

    match output {
        Some(out) => {
            std::fs::write(out, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Lesson plan written to {}", out.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lessonplan_core::PlanType;
    use lessonplan_test_utils::FakeUpstream;
    use secrecy::SecretString;
    use tempfile::TempDir;

    use super::*;

    fn write_request(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("request.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn read_request_accepts_camel_case_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(
            &tmp,
            r#"{"topic":"Photosynthesis","yearGroup":"Year 8","planType":"detailed"}"#,
        );

        let req = read_request(&path).unwrap();
        assert_eq!(req.topic(), Some("Photosynthesis"));
        assert_eq!(req.plan_type, PlanType::Detailed);
    }

    #[test]
    fn read_request_reports_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, "{ topic: ");

        let err = read_request(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse request file"));
    }

    #[test]
    fn read_request_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = read_request(&tmp.path().join("nope.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read request file"));
    }

    #[test]
    fn render_prompt_includes_given_fields_only() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, r#"{"topic":"Fractions","subject":"Maths"}"#);

        let prompt = render_prompt(&path).unwrap();
        assert!(prompt.contains("Topic: Fractions"));
        assert!(!prompt.lines().any(|l| l.starts_with("Duration:")));
    }

    #[tokio::test]
    async fn run_generate_writes_plan_to_output() {
        let upstream = FakeUpstream::replying_with_text(r#"{"homework":"Read chapter 3"}"#).await;
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, r#"{"topic":"Fractions","subject":"Maths"}"#);
        let out = tmp.path().join("plan.json");

        let gemini = GeminiConfig {
            base_url: upstream.base_url(),
            timeout: Duration::from_secs(5),
            ..GeminiConfig::new(Some(SecretString::from("test-key".to_string())))
        };
        run_generate(&path, Some(&out), gemini).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["homework"], "Read chapter 3");
        assert!(written["evaluation"].as_array().is_some_and(|e| !e.is_empty()));
        assert!(written["notes"].as_array().is_some_and(|n| !n.is_empty()));
    }

    #[tokio::test]
    async fn run_generate_without_key_fails() {
        let upstream = FakeUpstream::replying_with_text("{}").await;
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, r#"{"topic":"Fractions"}"#);

        let gemini = GeminiConfig {
            base_url: upstream.base_url(),
            ..GeminiConfig::new(None)
        };
        let err = run_generate(&path, None, gemini).await.unwrap_err();
        assert!(format!("{err:#}").contains("lesson plan generation failed"));
        assert_eq!(upstream.hits(), 0);
    }
}
