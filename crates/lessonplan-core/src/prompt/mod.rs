//! Prompt construction for lesson plan generation.
//!
//! Each plan type has its own pure template function that takes the typed
//! request and returns the complete prompt. Optional request fields that are
//! missing or blank never appear in the prompt: there is no placeholder text
//! for absent data.

pub mod templates;

use crate::request::{GenerationRequest, PlanType};

use templates::{
    DETAILED_SCHEMA, FORMATTING_RULES, JSON_ONLY_RULE, STANDARD_SCHEMA, STUDENT_FORMATTING_RULES,
    STUDENT_PLACEHOLDER, STUDENT_SCHEMA, TUTOR_FORMATTING_RULES, TUTOR_SCHEMA,
};

/// Generic reference used in tutor templates when no student name is given.
pub const GENERIC_STUDENT: &str = "the student";

/// Build the prompt for a request, selecting the template by plan type.
pub fn build_prompt(req: &GenerationRequest) -> String {
    match req.plan_type {
        PlanType::Detailed => detailed_prompt(req),
        PlanType::Student => student_prompt(req),
        PlanType::Tutor => tutor_prompt(req),
        PlanType::Standard => standard_prompt(req),
    }
}

/// Standard teacher lesson plan.
pub fn standard_prompt(req: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(4096);
    prompt.push_str(
        "You are an experienced UK teacher. Create a clear, practical lesson plan \
         for a whole-class lesson.\n\n",
    );
    push_details(&mut prompt, req);
    push_schema(&mut prompt, STANDARD_SCHEMA);
    push_rules(&mut prompt, FORMATTING_RULES);
    prompt
}

/// Standard plan plus the six pedagogy sections.
pub fn detailed_prompt(req: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(6144);
    prompt.push_str(
        "You are an experienced UK teacher and curriculum lead. Create a detailed lesson \
         plan that documents the pedagogy behind each decision as well as the lesson \
         sequence.\n\n",
    );
    push_details(&mut prompt, req);
    push_context(
        &mut prompt,
        "Additional Planning Context",
        &[
            (
                "Specialist Subject Knowledge Required",
                &req.specialist_subject_knowledge_required,
            ),
            ("Knowledge Revisited", &req.knowledge_revisited),
            ("Numeracy Opportunities", &req.numeracy_opportunities),
            ("Literacy Opportunities", &req.literacy_opportunities),
            ("Subject Pedagogies", &req.subject_pedagogies),
            (
                "Health and Safety Considerations",
                &req.health_and_safety_considerations,
            ),
        ],
    );
    push_schema(&mut prompt, DETAILED_SCHEMA);
    prompt.push_str(
        "Complete every pedagogy field. Where the teacher supplied context above, \
         build on it rather than replacing it.\n\n",
    );
    push_rules(&mut prompt, FORMATTING_RULES);
    prompt
}

/// Learner-facing, self-guided lesson written in the first person.
pub fn student_prompt(req: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(4096);
    prompt.push_str(
        "You are a supportive UK teacher writing a self-guided lesson that a learner \
         will read and work through on their own. Write it for the learner, not for \
         a teacher.\n\n",
    );
    push_details(&mut prompt, req);
    push_context(
        &mut prompt,
        "About the Learner",
        &[
            ("Learning Style", &req.learning_style),
            ("Specific Needs", &req.specific_needs),
        ],
    );
    push_schema(&mut prompt, STUDENT_SCHEMA);
    prompt.push_str(
        "The walkthrough must have exactly four steps, and the practice activities must \
         have three tiers of increasing difficulty.\n\n",
    );
    push_rules(&mut prompt, STUDENT_FORMATTING_RULES);
    prompt
}

/// 1:1 or small-group tutoring session, personalised to the named student.
pub fn tutor_prompt(req: &GenerationRequest) -> String {
    // Only template text is personalised; request values go in verbatim.
    let student = req.student_name().unwrap_or(GENERIC_STUDENT);
    let personalise = |template: &str| template.replace(STUDENT_PLACEHOLDER, student);

    let mut prompt = String::with_capacity(8192);
    prompt.push_str(&personalise(
        "You are an experienced UK private tutor. Create a personalised plan for a 1:1 \
         or small-group tutoring session with {student}.\n\n",
    ));
    push_details(&mut prompt, req);
    push_context(
        &mut prompt,
        "About the Student",
        &[
            ("Student Name", &req.student_name),
            ("Learning Style", &req.learning_style),
            ("Specific Needs", &req.specific_needs),
            ("Parent Goals", &req.parent_goals),
        ],
    );
    push_schema(&mut prompt, &personalise(TUTOR_SCHEMA));
    prompt.push_str(
        "Each stage must include detailed tutor guidance and a short coaching script. \
         The evaluation and notes must follow the named sub-sections shown above.\n\n",
    );
    let rules: Vec<String> = TUTOR_FORMATTING_RULES.iter().map(|&r| personalise(r)).collect();
    push_rules(&mut prompt, &rules);

    prompt
}

// ---------------------------------------------------------------------------
// Shared sections
// ---------------------------------------------------------------------------

/// Common preamble: one `Label: value` line per present field.
fn push_details(prompt: &mut String, req: &GenerationRequest) {
    prompt.push_str("Lesson Details:\n");
    let lines = [
        ("Subject", &req.subject),
        ("Topic", &req.topic),
        ("Year Group", &req.year_group),
        ("Class", &req.class),
        ("Duration", &req.duration),
        ("Exam Board", &req.exam_board),
        ("Learning Objectives", &req.objectives),
        ("Learning Outcomes", &req.outcomes),
    ];
    push_fields(prompt, &lines);
    prompt.push('\n');
}

/// Plan-type context block; omitted entirely when none of its fields are set.
fn push_context(prompt: &mut String, heading: &str, fields: &[(&str, &Option<String>)]) {
    if fields
        .iter()
        .all(|(_, v)| GenerationRequest::field(v).is_none())
    {
        return;
    }
    prompt.push_str(heading);
    prompt.push_str(":\n");
    push_fields(prompt, fields);
    prompt.push('\n');
}

fn push_fields(prompt: &mut String, fields: &[(&str, &Option<String>)]) {
    for (label, value) in fields {
        if let Some(v) = GenerationRequest::field(value) {
            prompt.push_str(&format!("{label}: {v}\n"));
        }
    }
}

fn push_schema(prompt: &mut String, schema: &str) {
    prompt.push_str("Return the lesson plan as a JSON object with exactly this structure:\n");
    prompt.push_str(schema);
    prompt.push_str("\n\n");
}

fn push_rules<S: AsRef<str>>(prompt: &mut String, rules: &[S]) {
    prompt.push_str("Requirements:\n");
    for rule in rules {
        prompt.push_str("- ");
        prompt.push_str(rule.as_ref());
        prompt.push('\n');
    }
    prompt.push_str("- ");
    prompt.push_str(JSON_ONLY_RULE);
    prompt.push('\n');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [PlanType; 4] = [
        PlanType::Standard,
        PlanType::Detailed,
        PlanType::Student,
        PlanType::Tutor,
    ];

    fn has_line(prompt: &str, label: &str) -> bool {
        prompt
            .lines()
            .any(|l| l.starts_with(&format!("{label}:")))
    }

    fn full_request(plan_type: PlanType) -> GenerationRequest {
        GenerationRequest {
            topic: Some("Fractions".to_string()),
            subject: Some("Maths".to_string()),
            year_group: Some("Year 7".to_string()),
            class: Some("7B".to_string()),
            duration: Some("60 minutes".to_string()),
            objectives: Some("Add fractions with unlike denominators".to_string()),
            outcomes: Some("Solve worded fraction problems".to_string()),
            exam_board: Some("AQA".to_string()),
            specialist_subject_knowledge_required: Some("Equivalent fractions".to_string()),
            knowledge_revisited: Some("Times tables".to_string()),
            numeracy_opportunities: Some("Mental arithmetic".to_string()),
            literacy_opportunities: Some("Numerator, denominator".to_string()),
            subject_pedagogies: Some("Bar models".to_string()),
            health_and_safety_considerations: Some("None".to_string()),
            student_name: Some("Amara".to_string()),
            learning_style: Some("Visual".to_string()),
            specific_needs: Some("Dyslexia".to_string()),
            parent_goals: Some("Pass the 11+".to_string()),
            plan_type,
        }
    }

    #[test]
    fn every_plan_type_contains_topic_and_subject() {
        for pt in ALL_TYPES {
            let prompt = build_prompt(&GenerationRequest::new("Photosynthesis", "Biology", pt));
            assert!(prompt.contains("Photosynthesis"), "{pt}: missing topic");
            assert!(prompt.contains("Biology"), "{pt}: missing subject");
            assert!(has_line(&prompt, "Topic"));
            assert!(has_line(&prompt, "Subject"));
        }
    }

    #[test]
    fn omitted_fields_produce_no_lines() {
        let labels = [
            "Year Group",
            "Class",
            "Duration",
            "Exam Board",
            "Learning Objectives",
            "Learning Outcomes",
            "Specialist Subject Knowledge Required",
            "Knowledge Revisited",
            "Numeracy Opportunities",
            "Literacy Opportunities",
            "Subject Pedagogies",
            "Health and Safety Considerations",
            "Student Name",
            "Learning Style",
            "Specific Needs",
            "Parent Goals",
        ];
        for pt in ALL_TYPES {
            let prompt = build_prompt(&GenerationRequest::new("Fractions", "Maths", pt));
            for label in labels {
                assert!(
                    !has_line(&prompt, label),
                    "{pt}: unexpected {label:?} line in prompt"
                );
            }
            assert!(!prompt.contains("Additional Planning Context"));
            assert!(!prompt.contains("About the Student"));
            assert!(!prompt.contains("About the Learner"));
        }
    }

    #[test]
    fn blank_fields_are_omitted() {
        let req = GenerationRequest {
            year_group: Some("  ".to_string()),
            ..GenerationRequest::new("Fractions", "Maths", PlanType::Standard)
        };
        assert!(!has_line(&build_prompt(&req), "Year Group"));
    }

    #[test]
    fn present_fields_are_listed() {
        let prompt = build_prompt(&full_request(PlanType::Standard));
        assert!(prompt.contains("Year Group: Year 7\n"));
        assert!(prompt.contains("Class: 7B\n"));
        assert!(prompt.contains("Exam Board: AQA\n"));
        assert!(prompt.contains("Learning Objectives: Add fractions with unlike denominators\n"));
    }

    #[test]
    fn detailed_prompt_lists_pedagogy_context() {
        let prompt = build_prompt(&full_request(PlanType::Detailed));
        assert!(prompt.contains("Additional Planning Context:"));
        assert!(prompt.contains("Subject Pedagogies: Bar models\n"));
        assert!(prompt.contains("\"health_and_safety_considerations\""));
        // Tutor-only fields stay out of the detailed plan.
        assert!(!has_line(&prompt, "Parent Goals"));
    }

    #[test]
    fn standard_prompt_ignores_plan_specific_fields() {
        let prompt = build_prompt(&full_request(PlanType::Standard));
        assert!(!has_line(&prompt, "Subject Pedagogies"));
        assert!(!has_line(&prompt, "Student Name"));
        assert!(!prompt.contains("\"subject_pedagogies\""));
    }

    #[test]
    fn standard_schema_has_four_stages() {
        let prompt = build_prompt(&GenerationRequest::new("Fractions", "Maths", PlanType::Standard));
        for stage in ["\"Starter\"", "\"Main1\"", "\"Main2\"", "\"Plenary\""] {
            assert!(prompt.contains(stage), "missing stage {stage}");
        }
        for key in ["\"homework\"", "\"evaluation\"", "\"notes\"", "\"resources\""] {
            assert!(prompt.contains(key), "missing key {key}");
        }
    }

    #[test]
    fn student_prompt_is_learner_facing() {
        let prompt = build_prompt(&full_request(PlanType::Student));
        assert!(prompt.contains("\"what_will_i_learn\""));
        assert!(prompt.contains("\"why_is_this_important\""));
        assert!(prompt.contains("\"getting_started\""));
        assert!(prompt.contains("\"challenge\""));
        assert!(prompt.contains("first person"));
        assert!(prompt.contains("Learning Style: Visual\n"));
    }

    #[test]
    fn tutor_prompt_uses_student_name() {
        let prompt = build_prompt(&full_request(PlanType::Tutor));
        assert!(prompt.contains("Student Name: Amara\n"));
        assert!(prompt.contains("Personalised practice for Amara"));
        assert!(prompt.contains("what Amara achieved against each objective"));
        assert!(prompt.contains("Summary of Amara's progress"));
        assert!(!prompt.contains(GENERIC_STUDENT));
        assert!(!prompt.contains(STUDENT_PLACEHOLDER));
    }

    #[test]
    fn tutor_prompt_keeps_request_text_verbatim() {
        let req = GenerationRequest {
            objectives: Some("Explain {student} notation in set-builder form".to_string()),
            ..full_request(PlanType::Tutor)
        };
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Learning Objectives: Explain {student} notation in set-builder form\n"));
        assert!(prompt.contains("Summary of Amara's progress"));
    }

    #[test]
    fn tutor_prompt_without_name_uses_generic_reference() {
        let prompt = build_prompt(&GenerationRequest::new("Fractions", "Maths", PlanType::Tutor));
        assert!(prompt.contains("Personalised practice for the student"));
        assert!(!prompt.contains(STUDENT_PLACEHOLDER));
    }

    #[test]
    fn tutor_prompt_has_named_evaluation_sections() {
        let prompt = build_prompt(&full_request(PlanType::Tutor));
        for section in [
            "Student Progress",
            "Teaching Effectiveness",
            "Next Session Planning",
            "Parent Communication Notes",
        ] {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.contains("\"tutor_tips\""));
    }

    #[test]
    fn default_plan_type_builds_standard_prompt() {
        let mut req = full_request(PlanType::Standard);
        let standard = build_prompt(&req);
        req.plan_type = PlanType::from_tag(Some("not-a-plan-type"));
        assert_eq!(build_prompt(&req), standard);
        req.plan_type = PlanType::from_tag(None);
        assert_eq!(build_prompt(&req), standard);
        assert_eq!(standard_prompt(&req), standard);
    }

    #[test]
    fn every_prompt_demands_json_only() {
        for pt in ALL_TYPES {
            let prompt = build_prompt(&GenerationRequest::new("Fractions", "Maths", pt));
            assert!(prompt.contains("Return ONLY valid JSON"), "{pt}");
        }
    }
}
