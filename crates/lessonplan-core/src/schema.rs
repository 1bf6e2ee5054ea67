//! Typed lesson plan schemas, one per [`PlanType`].
//!
//! The model is asked to follow an example JSON structure but nothing forces
//! it to. The pipeline returns the model's JSON as-is apart from backfilled
//! sections; [`LessonPlan::conform`] gives a typed, coerced view of it for
//! callers that want one:
//!
//! - list fields accept an array of scalars or a single string;
//! - text fields accept a scalar, or an array of scalars joined by newlines;
//! - numbers and booleans are rendered as text, blank list items are dropped.
//!
//! Structural mismatches (a stage list that is not an array, an object where
//! text is expected) fail the typed view only. Unknown keys are kept in
//! `extra` maps.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::request::PlanType;

/// Message shown to the user when the model output is JSON but not an object.
pub const UNEXPECTED_STRUCTURE_MESSAGE: &str =
    "AI returned an unexpected lesson plan structure, please try again";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("expected a JSON object for the {plan_type} lesson plan, found {found}")]
    NotAnObject {
        plan_type: PlanType,
        found: &'static str,
    },

    #[error("{plan_type} lesson plan does not match its schema: {source}")]
    Mismatch {
        plan_type: PlanType,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Text primitives
// ---------------------------------------------------------------------------

/// A free-text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(s) = scalar_text(item).map_err(D::Error::custom)? {
                        parts.push(s);
                    }
                }
                Ok(Self(parts.join("\n")))
            }
            Value::Object(_) => Err(D::Error::custom("expected text, found an object")),
            other => Ok(Self(scalar_text(other).map_err(D::Error::custom)?.unwrap_or_default())),
        }
    }
}

/// A list of free-text items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextList(pub Vec<String>);

impl TextList {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for TextList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(s) = scalar_text(item).map_err(D::Error::custom)? {
                        out.push(s);
                    }
                }
                Ok(Self(out))
            }
            Value::Object(_) => Err(D::Error::custom("expected a list of text, found an object")),
            other => Ok(Self(
                scalar_text(other)
                    .map_err(D::Error::custom)?
                    .into_iter()
                    .collect(),
            )),
        }
    }
}

/// Render a scalar as text. Blank strings and null yield `None`.
fn scalar_text(value: Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("expected text, found a nested array"),
        Value::Object(_) => Err("expected text, found an object"),
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// One stage of a lesson (Starter, Main1, Main2, Plenary).
///
/// `tutor_tips` only appears in tutor plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaching: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessing: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapting: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_tips: Option<Text>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Plan schemas
// ---------------------------------------------------------------------------

/// Teacher-facing plan. Used for both standard and tutor plans; the two share
/// a key set and differ only in prompt wording and stage guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_structure: Option<Vec<Stage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<TextList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Teacher plan plus the six pedagogy sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialist_subject_knowledge_required: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_revisited: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeracy_opportunities: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literacy_opportunities: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_pedagogies: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_and_safety_considerations: Option<Text>,
    #[serde(flatten)]
    pub base: TeacherPlan,
}

/// One step of the learner's self-guided walkthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkthroughStep {
    /// Step number; kept exactly as the model wrote it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_your_understanding: Option<Text>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Three-tier differentiated practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeActivities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getting_started: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_confidence: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<TextList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Learner-facing plan, written in the first person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_title: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_will_i_learn: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_is_this_important: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WalkthroughStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_activities: Option<PracticeActivities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_resources: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<TextList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A generated lesson plan, typed by the plan type it was requested as.
///
/// Serializes as the bare plan object (no tag).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LessonPlan {
    Standard(TeacherPlan),
    Detailed(DetailedPlan),
    Student(StudentPlan),
    Tutor(TeacherPlan),
}

impl LessonPlan {
    /// Read parsed model output as the schema for `plan_type`, coercing
    /// text-shaped fields. `value` itself is not modified.
    pub fn conform(value: &Value, plan_type: PlanType) -> Result<Self, SchemaError> {
        ensure_object(value, plan_type)?;
        let mismatch = |source| SchemaError::Mismatch { plan_type, source };
        let plan = match plan_type {
            PlanType::Standard => Self::Standard(TeacherPlan::deserialize(value).map_err(mismatch)?),
            PlanType::Detailed => Self::Detailed(DetailedPlan::deserialize(value).map_err(mismatch)?),
            PlanType::Student => Self::Student(StudentPlan::deserialize(value).map_err(mismatch)?),
            PlanType::Tutor => Self::Tutor(TeacherPlan::deserialize(value).map_err(mismatch)?),
        };
        Ok(plan)
    }

    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::Standard(_) => PlanType::Standard,
            Self::Detailed(_) => PlanType::Detailed,
            Self::Student(_) => PlanType::Student,
            Self::Tutor(_) => PlanType::Tutor,
        }
    }

    pub fn evaluation(&self) -> Option<&TextList> {
        match self {
            Self::Standard(p) | Self::Tutor(p) => p.evaluation.as_ref(),
            Self::Detailed(p) => p.base.evaluation.as_ref(),
            Self::Student(p) => p.evaluation.as_ref(),
        }
    }

    pub fn notes(&self) -> Option<&TextList> {
        match self {
            Self::Standard(p) | Self::Tutor(p) => p.notes.as_ref(),
            Self::Detailed(p) => p.base.notes.as_ref(),
            Self::Student(p) => p.notes.as_ref(),
        }
    }
}

/// Reject model output whose top level is not a JSON object.
pub fn ensure_object(value: &Value, plan_type: PlanType) -> Result<(), SchemaError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(SchemaError::NotAnObject {
            plan_type,
            found: json_kind(value),
        })
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
