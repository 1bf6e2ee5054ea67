//! Text generation backends.
//!
//! The pipeline only needs "prompt in, text out", expressed by the
//! [`TextGenerator`] trait. [`GeminiClient`] is the production backend.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiClient, GeminiConfig};

/// Fallback message when the upstream gives no usable error message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate lesson plan";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("generation service API key is not configured")]
    MissingApiKey,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("generation service request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Transport(String),

    #[error("generation service returned no text")]
    EmptyResponse,

    #[error("unexpected response from generation service: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Message safe to show to the person who submitted the request.
    ///
    /// Upstream HTTP errors carry the service's own message; configuration
    /// and transport problems collapse to the generic failure message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// A backend that turns a prompt into generated text.
///
/// Object safe so the server can hold an `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate text for `prompt`. Exactly one attempt; no retries.
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};
