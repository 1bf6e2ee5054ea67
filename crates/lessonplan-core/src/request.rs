//! Lesson plan generation request and the plan-type discriminator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// PlanType
// ---------------------------------------------------------------------------

/// Which prompt template and response schema a request uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    #[default]
    Standard,
    Detailed,
    Student,
    Tutor,
}

impl PlanType {
    /// Resolve an optional tag, falling back to [`PlanType::Standard`] when
    /// the tag is missing or unrecognized.
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn is_tutor(self) -> bool {
        matches!(self, Self::Tutor)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standard => "standard",
            Self::Detailed => "detailed",
            Self::Student => "student",
            Self::Tutor => "tutor",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanType {
    type Err = PlanTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            "student" => Ok(Self::Student),
            "tutor" => Ok(Self::Tutor),
            other => Err(PlanTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanType`] string.
#[derive(Debug, Clone)]
pub struct PlanTypeParseError(pub String);

impl fmt::Display for PlanTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan type: {:?}", self.0)
    }
}

impl std::error::Error for PlanTypeParseError {}

impl<'de> Deserialize<'de> for PlanType {
    /// Never fails: anything that is not one of the four known tags
    /// (including non-string JSON values) becomes `Standard`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_tag(raw.as_str()))
    }
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// A lesson plan generation request, as submitted by the lesson form.
///
/// Every field except `plan_type` is optional. Blank strings are treated the
/// same as missing fields; use [`GenerationRequest::field`] or the typed
/// accessors to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub topic: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(alias = "yearGroup", deserialize_with = "lenient_text")]
    pub year_group: Option<String>,
    #[serde(alias = "className", deserialize_with = "lenient_text")]
    pub class: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub objectives: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub outcomes: Option<String>,
    #[serde(alias = "examBoard", deserialize_with = "lenient_text")]
    pub exam_board: Option<String>,

    // Detailed plans.
    #[serde(alias = "specialistSubjectKnowledgeRequired", deserialize_with = "lenient_text")]
    pub specialist_subject_knowledge_required: Option<String>,
    #[serde(alias = "knowledgeRevisited", deserialize_with = "lenient_text")]
    pub knowledge_revisited: Option<String>,
    #[serde(alias = "numeracyOpportunities", deserialize_with = "lenient_text")]
    pub numeracy_opportunities: Option<String>,
    #[serde(alias = "literacyOpportunities", deserialize_with = "lenient_text")]
    pub literacy_opportunities: Option<String>,
    #[serde(alias = "subjectPedagogies", deserialize_with = "lenient_text")]
    pub subject_pedagogies: Option<String>,
    #[serde(alias = "healthAndSafetyConsiderations", deserialize_with = "lenient_text")]
    pub health_and_safety_considerations: Option<String>,

    // Student and tutor plans.
    #[serde(alias = "studentName", deserialize_with = "lenient_text")]
    pub student_name: Option<String>,
    #[serde(alias = "learningStyle", deserialize_with = "lenient_text")]
    pub learning_style: Option<String>,
    #[serde(alias = "specificNeeds", deserialize_with = "lenient_text")]
    pub specific_needs: Option<String>,
    #[serde(alias = "parentGoals", deserialize_with = "lenient_text")]
    pub parent_goals: Option<String>,

    #[serde(rename = "planType", alias = "plan_type")]
    pub plan_type: PlanType,
}

/// Accept strings as-is and render numbers and booleans as text. Any other
/// JSON value (objects, arrays, null) counts as a missing field.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

impl GenerationRequest {
    /// Start a request for the given topic, subject and plan type.
    pub fn new(topic: impl Into<String>, subject: impl Into<String>, plan_type: PlanType) -> Self {
        Self {
            topic: Some(topic.into()),
            subject: Some(subject.into()),
            plan_type,
            ..Self::default()
        }
    }

    /// Return the trimmed value of an optional field, or `None` when the
    /// field is missing or blank.
    pub fn field(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn topic(&self) -> Option<&str> {
        Self::field(&self.topic)
    }

    pub fn subject(&self) -> Option<&str> {
        Self::field(&self.subject)
    }

    pub fn student_name(&self) -> Option<&str> {
        Self::field(&self.student_name)
    }
}
