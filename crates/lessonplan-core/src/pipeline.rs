//! The lesson generation pipeline.
//!
//! ```text
//! GenerationRequest --build_prompt--> prompt --TextGenerator--> raw text
//!     --parse_response--> JSON --backfill--> JSON
//! ```
//!
//! Each stage returns a `Result`; the first failure ends the request. Apart
//! from `evaluation` and `notes`, the returned plan is exactly what the model
//! wrote.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::backfill::backfill_value;
use crate::client::{TextGenerator, UpstreamError};
use crate::normalize::{NormalizeError, parse_response};
use crate::prompt::build_prompt;
use crate::request::GenerationRequest;
use crate::schema::{LessonPlan, SchemaError, UNEXPECTED_STRUCTURE_MESSAGE};

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing configuration, network failure or a non-2xx upstream status.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The model output was not valid JSON after fence-stripping.
    #[error(transparent)]
    InvalidJson(#[from] NormalizeError),

    /// The model output was JSON but not an object, or (typed view only)
    /// did not match the plan schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl GenerateError {
    /// Message returned to the caller in the error response body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream(e) => e.user_message(),
            Self::InvalidJson(e) => e.to_string(),
            Self::Schema(_) => UNEXPECTED_STRUCTURE_MESSAGE.to_string(),
        }
    }
}

/// Runs generation requests against a [`TextGenerator`].
///
/// Holds no per-request state; one planner can serve concurrent requests.
pub struct LessonPlanner {
    generator: Arc<dyn TextGenerator>,
}

impl LessonPlanner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Run the full pipeline for one request.
    pub async fn generate(&self, req: &GenerationRequest) -> Result<Value, GenerateError> {
        let plan_type = req.plan_type;
        let prompt = build_prompt(req);
        tracing::info!(
            %plan_type,
            backend = self.generator.name(),
            prompt_length = prompt.len(),
            "generating lesson plan"
        );

        let raw = self.generator.generate(&prompt).await?;
        tracing::debug!(response_length = raw.len(), "generation service responded");

        let value = parse_response(&raw)?;
        let plan = backfill_value(value, plan_type, req.student_name()).inspect_err(|e| {
            tracing::error!(error = %e, raw_response = %raw, "generated lesson plan is not a JSON object");
        })?;

        if let Err(e) = LessonPlan::conform(&plan, plan_type) {
            tracing::warn!(%plan_type, error = %e, "generated lesson plan does not follow the requested structure");
        }

        tracing::info!(%plan_type, "lesson plan generated");
        Ok(plan)
    }

    /// Same as [`LessonPlanner::generate`] but returns the typed view of the
    /// plan. Unlike `generate`, a plan that does not match its schema is an
    /// error here.
    pub async fn generate_plan(&self, req: &GenerationRequest) -> Result<LessonPlan, GenerateError> {
        let value = self.generate(req).await?;
        Ok(LessonPlan::conform(&value, req.plan_type)?)
    }
}
