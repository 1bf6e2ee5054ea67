//! Core of the lesson plan generator: request model, prompt templates,
//! generation backends, response normalization, plan schemas and backfill.

pub mod backfill;
pub mod client;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod request;
pub mod schema;

pub use client::{GeminiClient, GeminiConfig, TextGenerator, UpstreamError};
pub use pipeline::{GenerateError, LessonPlanner};
pub use prompt::build_prompt;
pub use request::{GenerationRequest, PlanType};
pub use schema::LessonPlan;
