//! Guarantee that `evaluation` and `notes` always carry usable content.
//!
//! The model frequently leaves these two sections out or returns them empty.
//! When that happens they are replaced with fixed guidance the teacher can
//! fill in after the lesson. Tutor plans get student-centric prompts; every
//! other plan type gets classroom prompts.
//!
//! Backfill works on the raw JSON object. Every other key, and any
//! `evaluation` or `notes` value that has content, is left byte-for-byte as
//! the model wrote it.

use serde_json::{Map, Value};

use crate::prompt::GENERIC_STUDENT;
use crate::request::PlanType;
use crate::schema::{SchemaError, TextList, json_kind};

const EVALUATION_KEY: &str = "evaluation";
const NOTES_KEY: &str = "notes";

const CLASSROOM_EVALUATION: &[&str] = &[
    "Objectives Achieved: [e.g. Most pupils could add fractions with unlike denominators; 5 pupils still need support with finding common denominators]",
    "Misconceptions: [e.g. Several pupils added the denominators together; address with fraction walls next lesson]",
    "Engagement: [e.g. Pupils were most engaged during the paired activity; the plenary felt rushed]",
    "Improvements: [e.g. Allow more time for Main2 and prepare an extra challenge task for early finishers]",
];

const CLASSROOM_NOTES: &[&str] = &[
    "Preparation:",
    "[e.g. Print worksheets, test the slides and set out mini whiteboards before the lesson]",
    "Differentiation:",
    "[e.g. Seat pupils needing support near the front; provide scaffolded worksheets and extension questions]",
    "Follow-up:",
    "[e.g. Revisit common misconceptions in the next starter; mark exit tickets before the next lesson]",
];

const TUTOR_EVALUATION: &[&str] = &[
    "Student Progress: [e.g. {student} can now add fractions with unlike denominators independently]",
    "Confidence: [e.g. {student} rated their confidence 2/5 at the start and 4/5 by the end]",
    "Teaching Effectiveness: [e.g. Visual fraction bars worked well for {student}; abstract explanations did not]",
    "Parent Communication: [e.g. Share today's success and suggest 10 minutes of practice twice a week]",
];

const TUTOR_NOTES: &[&str] = &[
    "Student Progress:",
    "[e.g. Key achievements and remaining gaps for {student}]",
    "Teaching Effectiveness:",
    "[e.g. Approaches that worked well and what to change next time]",
    "Next Session Planning:",
    "[e.g. Topics to revisit, new content to introduce and resources to prepare]",
    "Parent Communication Notes:",
    "[e.g. Summary of {student}'s progress and how parents can support at home]",
];

/// Placeholder evaluation prompts for a plan type.
pub fn placeholder_evaluation(plan_type: PlanType, student_name: Option<&str>) -> TextList {
    if plan_type.is_tutor() {
        personalise(TUTOR_EVALUATION, student_name)
    } else {
        TextList::new(CLASSROOM_EVALUATION.iter().copied())
    }
}

/// Placeholder notes sections for a plan type.
pub fn placeholder_notes(plan_type: PlanType, student_name: Option<&str>) -> TextList {
    if plan_type.is_tutor() {
        personalise(TUTOR_NOTES, student_name)
    } else {
        TextList::new(CLASSROOM_NOTES.iter().copied())
    }
}

fn personalise(lines: &[&str], student_name: Option<&str>) -> TextList {
    let student = student_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(GENERIC_STUDENT);
    TextList::new(lines.iter().map(|l| l.replace("{student}", student)))
}

/// Whether a section counts as missing: absent, `null`, a blank string, or
/// an array holding nothing but blank strings and nulls.
///
/// Anything else, including objects and numbers, counts as content.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.iter().all(|item| match item {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }),
        Some(_) => false,
    }
}

/// Fill in `evaluation` and `notes` when they are missing.
///
/// Sections with content are left exactly as they are, so applying this
/// twice is the same as applying it once.
pub fn backfill(plan: &mut Map<String, Value>, plan_type: PlanType, student_name: Option<&str>) {
    if is_missing(plan.get(EVALUATION_KEY)) {
        tracing::debug!(%plan_type, "backfilling empty evaluation");
        let lines = placeholder_evaluation(plan_type, student_name);
        plan.insert(EVALUATION_KEY.to_string(), Value::from(lines.0));
    }
    if is_missing(plan.get(NOTES_KEY)) {
        tracing::debug!(%plan_type, "backfilling empty notes");
        let lines = placeholder_notes(plan_type, student_name);
        plan.insert(NOTES_KEY.to_string(), Value::from(lines.0));
    }
}

/// Backfill parsed model output. Only a top level that is not a JSON object
/// is rejected.
pub fn backfill_value(
    value: Value,
    plan_type: PlanType,
    student_name: Option<&str>,
) -> Result<Value, SchemaError> {
    match value {
        Value::Object(mut plan) => {
            backfill(&mut plan, plan_type, student_name);
            Ok(Value::Object(plan))
        }
        other => Err(SchemaError::NotAnObject {
            plan_type,
            found: json_kind(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .expect("expected an array")
            .iter()
            .map(|v| v.as_str().expect("expected a string"))
            .collect()
    }

    #[test]
    fn missing_evaluation_gets_classroom_placeholder() {
        let out = backfill_value(json!({}), PlanType::Standard, None).unwrap();
        let evaluation = strings(&out["evaluation"]);
        assert!(!evaluation.is_empty());
        assert!(evaluation.iter().any(|s| s.contains("Objectives Achieved")));
        assert!(!evaluation.iter().any(|s| s.contains("Student Progress")));
    }

    #[test]
    fn missing_evaluation_gets_tutor_placeholder() {
        let out = backfill_value(json!({}), PlanType::Tutor, None).unwrap();
        let evaluation = strings(&out["evaluation"]);
        assert!(evaluation.iter().any(|s| s.contains("Student Progress")));
        assert!(!evaluation.iter().any(|s| s.contains("Objectives Achieved")));
    }

    #[test]
    fn tutor_placeholders_use_student_name() {
        let out = backfill_value(json!({}), PlanType::Tutor, Some("Amara")).unwrap();
        let notes = strings(&out["notes"]);
        assert!(notes.iter().any(|s| s.contains("Amara's progress")));
        assert!(!notes.iter().any(|s| s.contains("{student}")));

        let out = backfill_value(json!({}), PlanType::Tutor, None).unwrap();
        let notes = strings(&out["notes"]);
        assert!(notes.iter().any(|s| s.contains("the student's progress")));
    }

    #[test]
    fn notes_are_headers_interleaved_with_examples() {
        for pt in [PlanType::Standard, PlanType::Tutor] {
            let notes = placeholder_notes(pt, None);
            for (i, line) in notes.iter().enumerate() {
                if i % 2 == 0 {
                    assert!(line.ends_with(':'), "{pt}: header expected, got {line:?}");
                } else {
                    assert!(line.starts_with('['), "{pt}: example expected, got {line:?}");
                }
            }
        }
    }

    #[test]
    fn non_tutor_types_share_classroom_placeholders() {
        for pt in [PlanType::Standard, PlanType::Detailed, PlanType::Student] {
            assert_eq!(
                placeholder_evaluation(pt, Some("Amara")),
                placeholder_evaluation(PlanType::Standard, None)
            );
            assert_eq!(
                placeholder_notes(pt, None),
                placeholder_notes(PlanType::Standard, None)
            );
        }
    }

    #[test]
    fn empty_array_and_blank_string_trigger_backfill() {
        for empty in [json!([]), json!(""), json!("   "), json!(null), json!([""])] {
            let out = backfill_value(
                json!({ "evaluation": empty.clone(), "notes": empty.clone() }),
                PlanType::Detailed,
                None,
            )
            .unwrap();
            assert!(!strings(&out["evaluation"]).is_empty(), "input: {empty}");
            assert!(!strings(&out["notes"]).is_empty(), "input: {empty}");
        }
    }

    #[test]
    fn non_empty_sections_are_left_alone() {
        let input = json!({
            "evaluation": ["Pupils met the objective"],
            "notes": ["Book the hall"],
            "homework": "Page 12",
        });
        let out = backfill_value(input.clone(), PlanType::Standard, None).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn non_empty_string_evaluation_is_left_alone() {
        let input = json!({
            "evaluation": "Most pupils met the objective.",
            "notes": "Book the hall for next week.",
        });
        let out = backfill_value(input.clone(), PlanType::Tutor, Some("Amara")).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn unexpected_shapes_count_as_content() {
        let input = json!({
            "evaluation": { "summary": "ok" },
            "notes": [["nested"]],
        });
        let out = backfill_value(input.clone(), PlanType::Standard, None).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn other_fields_are_not_touched() {
        let input = json!({
            "objectives": "Add fractions",
            "lesson_structure": [{ "stage": "Starter", "duration": 10 }],
            "resources": ["Slides", ""],
            "homework": { "task": "Worksheet" },
        });
        let out = backfill_value(input.clone(), PlanType::Standard, None).unwrap();
        let mut without_backfill = out.as_object().unwrap().clone();
        without_backfill.remove("evaluation");
        without_backfill.remove("notes");
        assert_eq!(Value::Object(without_backfill), input);
    }

    #[test]
    fn is_missing_rules() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!([null, " "]))));
        assert!(!is_missing(Some(&json!(["", "Reflect on pace"]))));
        assert!(!is_missing(Some(&json!(0))));
        assert!(!is_missing(Some(&json!({}))));
    }

    #[test]
    fn backfill_is_idempotent() {
        for pt in [
            PlanType::Standard,
            PlanType::Detailed,
            PlanType::Student,
            PlanType::Tutor,
        ] {
            let once = backfill_value(json!({ "evaluation": [] }), pt, Some("Amara")).unwrap();
            let twice = backfill_value(once.clone(), pt, Some("Amara")).unwrap();
            assert_eq!(twice, once, "{pt}");
        }
    }

    #[test]
    fn backfill_value_rejects_non_objects() {
        let err = backfill_value(json!("text"), PlanType::Standard, None).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject { found: "a string", .. }));
    }
}
