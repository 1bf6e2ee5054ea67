//! Literal prompt text: the example-JSON schema for each plan type and the
//! shared formatting rules.
//!
//! The tutor templates contain a `{student}` placeholder that is replaced
//! with the student's name (or "the student") when the prompt is built.

/// Placeholder substituted in the tutor templates.
pub const STUDENT_PLACEHOLDER: &str = "{student}";

pub const STANDARD_SCHEMA: &str = r#"{
  "objectives": ["Clear, measurable learning objective", "Second learning objective"],
  "outcomes": ["Pupils will be able to ...", "Most pupils will ...", "Some pupils will ..."],
  "lesson_structure": [
    {
      "stage": "Starter",
      "duration": "10 minutes",
      "teaching": "What the teacher does to hook pupils and activate prior knowledge",
      "learning": "What pupils do during the starter",
      "assessing": "How understanding is checked (e.g. mini whiteboards, cold calling)",
      "adapting": "Support and stretch for SEN, EAL and higher-attaining pupils"
    },
    {
      "stage": "Main1",
      "duration": "20 minutes",
      "teaching": "Explicit instruction and modelling of the new content",
      "learning": "Guided practice activity",
      "assessing": "Hinge questions and circulation",
      "adapting": "Scaffolds, worked examples and extension tasks"
    },
    {
      "stage": "Main2",
      "duration": "20 minutes",
      "teaching": "Facilitation of independent or collaborative application",
      "learning": "Independent practice or group task",
      "assessing": "Peer and self assessment against success criteria",
      "adapting": "Differentiated task tiers"
    },
    {
      "stage": "Plenary",
      "duration": "10 minutes",
      "teaching": "Consolidation of key learning and link to next lesson",
      "learning": "Exit ticket or reflection task",
      "assessing": "Review of exit tickets against the objectives",
      "adapting": "Sentence starters and targeted questioning"
    }
  ],
  "homework": "A short, purposeful task that consolidates this lesson",
  "resources": ["Slides", "Worksheets", "Mini whiteboards"],
  "evaluation": ["Reflection prompt on whether objectives were met", "Reflection prompt on misconceptions"],
  "notes": ["Practical note for the teacher", "Follow-up action"]
}"#;

pub const DETAILED_SCHEMA: &str = r#"{
  "objectives": ["Clear, measurable learning objective", "Second learning objective"],
  "outcomes": ["Pupils will be able to ...", "Most pupils will ...", "Some pupils will ..."],
  "specialist_subject_knowledge_required": "Subject knowledge the teacher needs, including common misconceptions",
  "knowledge_revisited": "Prior learning this lesson builds on and how it is retrieved",
  "numeracy_opportunities": "Specific points in the lesson where numeracy is developed",
  "literacy_opportunities": "Key vocabulary, reading and extended writing opportunities",
  "subject_pedagogies": "Subject-specific teaching approaches used and why they suit this content",
  "health_and_safety_considerations": "Risks and control measures, or a statement that none apply",
  "lesson_structure": [
    {
      "stage": "Starter",
      "duration": "10 minutes",
      "teaching": "Retrieval practice linked to knowledge revisited",
      "learning": "What pupils do during the starter",
      "assessing": "How prior knowledge is checked",
      "adapting": "Support and stretch for SEN, EAL and higher-attaining pupils"
    },
    {
      "stage": "Main1",
      "duration": "20 minutes",
      "teaching": "Explicit instruction drawing on the subject pedagogies above",
      "learning": "Guided practice with key vocabulary in use",
      "assessing": "Hinge questions targeting misconceptions",
      "adapting": "Scaffolds, worked examples and extension tasks"
    },
    {
      "stage": "Main2",
      "duration": "20 minutes",
      "teaching": "Facilitation of application, including numeracy or literacy focus",
      "learning": "Independent practice or extended writing",
      "assessing": "Success criteria and targeted feedback",
      "adapting": "Differentiated task tiers"
    },
    {
      "stage": "Plenary",
      "duration": "10 minutes",
      "teaching": "Consolidation and link to next lesson",
      "learning": "Exit ticket or reflection task",
      "assessing": "Review of exit tickets against the objectives",
      "adapting": "Sentence starters and targeted questioning"
    }
  ],
  "homework": "A short, purposeful task that consolidates this lesson",
  "resources": ["Slides", "Worksheets", "Equipment list"],
  "evaluation": ["Reflection prompt on whether objectives were met", "Reflection prompt on misconceptions"],
  "notes": ["Practical note for the teacher", "Follow-up action"]
}"#;

pub const STUDENT_SCHEMA: &str = r#"{
  "lesson_title": "A friendly, motivating title for the lesson",
  "what_will_i_learn": ["I will learn ...", "I will be able to ..."],
  "why_is_this_important": "Why this matters to me, in real life and in my exams",
  "materials": ["Things I need before I start"],
  "steps": [
    {
      "step": 1,
      "title": "Get ready",
      "instructions": "What I do first, explained simply",
      "check_your_understanding": "A quick question I can answer to check I am ready to move on"
    },
    {
      "step": 2,
      "title": "Learn the idea",
      "instructions": "A clear explanation with a worked example",
      "check_your_understanding": "A question about the worked example"
    },
    {
      "step": 3,
      "title": "Try it myself",
      "instructions": "Guided practice I can do on my own",
      "check_your_understanding": "How I know if my answers are right"
    },
    {
      "step": 4,
      "title": "Put it all together",
      "instructions": "A task that combines everything from this lesson",
      "check_your_understanding": "A final check of what I have learned"
    }
  ],
  "practice_activities": {
    "getting_started": ["Short confidence-building questions"],
    "building_confidence": ["Questions at the expected level"],
    "challenge": ["Harder questions that stretch my thinking"]
  },
  "homework": "A task I can complete on my own at home",
  "help_resources": ["Where I can find help if I get stuck"],
  "reflection": ["What did I find easy?", "What do I need to practise more?"],
  "evaluation": ["How I can tell I have met each learning goal"],
  "notes": ["Tips and reminders for me"]
}"#;

pub const TUTOR_SCHEMA: &str = r#"{
  "objectives": ["Objective written specifically for {student}", "Second objective for {student}"],
  "outcomes": ["By the end of the session {student} will be able to ..."],
  "lesson_structure": [
    {
      "stage": "Starter",
      "duration": "10 minutes",
      "teaching": "Warm welcome and check-in: ask {student} how they feel about the topic on a scale of 1 to 5. Use a low-stakes retrieval question from last session.",
      "learning": "{student} answers retrieval questions aloud and explains their reasoning",
      "assessing": "Listen for gaps and misconceptions; note confidence level",
      "adapting": "If {student} struggles, step back to a simpler prerequisite example",
      "tutor_tips": "Coaching script: 'Talk me through how you got that.' Praise effort and strategy, not just answers."
    },
    {
      "stage": "Main1",
      "duration": "20 minutes",
      "teaching": "Model the new idea with a worked example, thinking aloud at each step. Then complete a second example together, with {student} leading.",
      "learning": "{student} completes guided examples with decreasing support",
      "assessing": "Ask {student} to explain each step back in their own words",
      "adapting": "Match the explanation to {student}'s learning style; use visuals, manipulatives or verbal reasoning as appropriate",
      "tutor_tips": "Coaching script: 'What would you do next?' Wait at least five seconds before offering a hint."
    },
    {
      "stage": "Main2",
      "duration": "20 minutes",
      "teaching": "Set independent practice that moves from fluency to reasoning and problem solving",
      "learning": "{student} works independently while thinking aloud",
      "assessing": "Mark answers live and give immediate, specific feedback",
      "adapting": "Offer a challenge question if {student} is secure; revisit the worked example if not",
      "tutor_tips": "Coaching script: 'Which question felt hardest and why?' Record errors to inform the next session."
    },
    {
      "stage": "Plenary",
      "duration": "10 minutes",
      "teaching": "Summarise the key learning together and agree one target",
      "learning": "{student} explains the main idea in one or two sentences and rates confidence again",
      "assessing": "Compare start and end confidence ratings",
      "adapting": "Adjust homework difficulty based on how the session went",
      "tutor_tips": "Coaching script: 'What will you remember from today?' End on a success."
    }
  ],
  "resources": ["Worked examples", "Practice questions", "Visual aids"],
  "homework": "Personalised practice for {student} that targets today's gaps and takes about 20 minutes",
  "evaluation": [
    "Student Progress: what {student} achieved against each objective",
    "Confidence: how {student}'s confidence changed during the session",
    "Teaching Effectiveness: which explanations and resources worked for {student}",
    "Next Session Planning: what to revisit and what to introduce next"
  ],
  "notes": [
    "Student Progress:",
    "[Key achievements and remaining gaps for {student}]",
    "Teaching Effectiveness:",
    "[Approaches that worked well and what to change]",
    "Next Session Planning:",
    "[Topics to revisit, new content and resources to prepare]",
    "Parent Communication Notes:",
    "[Summary of {student}'s progress and how parents can support at home]"
  ]
}"#;

/// Formatting rules appended to every teacher-facing prompt.
pub const FORMATTING_RULES: &[&str] = &[
    "Make every activity age-appropriate for the pupils described above.",
    "Include practical accommodations for pupils with special educational needs (SEN) and for EAL learners.",
    "Use UK curriculum terminology (Key Stages, year groups, exam boards) and British English spelling.",
    "Keep stage durations realistic and consistent with the total lesson length.",
    "Write concrete, actionable guidance rather than generic advice.",
];

/// Formatting rules for the learner-facing (student) plan.
pub const STUDENT_FORMATTING_RULES: &[&str] = &[
    "Write directly to the learner in the first person (\"I will ...\") using friendly, encouraging language.",
    "Make every explanation and activity age-appropriate and easy to follow without a teacher present.",
    "Include accommodations for learners with special educational needs (SEN), such as chunked instructions and visual cues.",
    "Use UK curriculum terminology and British English spelling.",
];

/// Formatting rules for 1:1 or small-group tutoring plans.
pub const TUTOR_FORMATTING_RULES: &[&str] = &[
    "Personalise every section to {student}; refer to them by name.",
    "Make every activity age-appropriate and suited to 1:1 or small-group tutoring.",
    "Include accommodations for any special educational needs (SEN) described above.",
    "Use UK curriculum terminology and British English spelling.",
    "Embed short coaching scripts the tutor can say word for word.",
];

/// Final instruction shared by all plan types.
pub const JSON_ONLY_RULE: &str =
    "Return ONLY valid JSON matching the structure above. Do not wrap it in markdown code fences and do not add any commentary.";
