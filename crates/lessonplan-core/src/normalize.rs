//! Turn the generation service's raw text into JSON.

use serde_json::Value;
use thiserror::Error;

/// Message shown to the user when the model output cannot be parsed.
pub const INVALID_JSON_MESSAGE: &str = "AI returned invalid JSON, please try again";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("AI returned invalid JSON, please try again")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
}

/// Strip a surrounding markdown code fence (with or without a language tag).
///
/// Text that does not start with a fence is returned trimmed but otherwise
/// unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the language tag (e.g. `json`) on the opening line.
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Fence-strip and parse the model output.
///
/// A malformed response is rejected as a whole; the error and the offending
/// text are logged.
pub fn parse_response(raw: &str) -> Result<Value, NormalizeError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!(
            json_error = %e,
            response_length = raw.len(),
            raw_response = %raw,
            "failed to parse generated lesson plan as JSON"
        );
        NormalizeError::InvalidJson {
            source: e,
            raw: raw.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_fenced_json_with_tag() {
        let value = parse_response("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn parses_fenced_json_without_tag() {
        let value = parse_response("```\n{\"a\":1}\n```").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn parses_unwrapped_json() {
        assert_eq!(parse_response("{\"a\":1}").unwrap(), json!({ "a": 1 }));
        assert_eq!(
            parse_response("  \n{\"a\":1}\n ").unwrap(),
            json!({ "a": 1 })
        );
    }

    #[test]
    fn fenced_and_unfenced_parse_identically() {
        assert_eq!(
            parse_response("```json\n{\"a\":1}\n```").unwrap(),
            parse_response("{\"a\":1}").unwrap()
        );
    }

    #[test]
    fn single_line_fence_is_stripped() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn unterminated_fence_still_strips_opening() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_response("not json").unwrap_err();
        assert_eq!(err.to_string(), INVALID_JSON_MESSAGE);
        let NormalizeError::InvalidJson { raw, .. } = err;
        assert_eq!(raw, "not json");
    }

    #[test]
    fn rejects_truncated_json() {
        assert!(parse_response("```json\n{\"objectives\": [\"a\",\n```").is_err());
    }
}
