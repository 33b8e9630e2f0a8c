// src/store/fixtures.rs

//! Demo data the store starts with when `SEED_FIXTURES` is on.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, TimeZone, Utc};

use crate::models::{
    question::{OptionLabel, Question},
    result::{Score, TestResult},
    section::Section,
    test::{RegistrationField, TabSwitchPolicy, Test, TestSettings},
};
use crate::store::Collections;

pub const DEMO_TEACHER_ID: &str = "demo-teacher";
pub const DEMO_STUDENT_ID: &str = "demo-student";

fn question(id: &str, text: &str, options: [&str; 4], correct: OptionLabel) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: OptionLabel::ALL
            .into_iter()
            .zip(options.map(str::to_string))
            .collect::<BTreeMap<_, _>>(),
        correct_answer: correct,
    }
}

pub fn questions_general_knowledge() -> Vec<Question> {
    vec![
        question(
            "gk-1",
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            OptionLabel::B,
        ),
        question(
            "gk-2",
            "What is the largest ocean on Earth?",
            ["Atlantic", "Indian", "Arctic", "Pacific"],
            OptionLabel::D,
        ),
        question(
            "gk-3",
            "Who wrote 'Romeo and Juliet'?",
            ["William Shakespeare", "Charles Dickens", "Jane Austen", "Mark Twain"],
            OptionLabel::A,
        ),
    ]
}

pub fn questions_mathematics() -> Vec<Question> {
    vec![
        question("math-1", "What is 12 x 12?", ["124", "144", "132", "154"], OptionLabel::B),
        question(
            "math-2",
            "What is the square root of 81?",
            ["7", "8", "9", "10"],
            OptionLabel::C,
        ),
        question(
            "math-3",
            "Solve for x: 2x + 6 = 14",
            ["3", "4", "5", "8"],
            OptionLabel::B,
        ),
        question(
            "math-4",
            "What is 15% of 200?",
            ["15", "20", "30", "35"],
            OptionLabel::C,
        ),
    ]
}

pub fn collections() -> Collections {
    let base = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).single().unwrap_or_else(Utc::now);

    let math = Test {
        id: "test-math-basics".to_string(),
        title: "Basic Mathematics".to_string(),
        description: "Arithmetic and simple algebra warm-up.".to_string(),
        questions: questions_mathematics(),
        duration: 30,
        marks_per_question: 4.0,
        negative_marks: 1.0,
        is_public: true,
        created_by: Some(DEMO_TEACHER_ID.to_string()),
        settings: Some(TestSettings {
            attempt_limit: Some(3),
            strict_timer: true,
            tab_switch_policy: TabSwitchPolicy::Warn,
            show_results_immediately: true,
            registration_form: vec![
                RegistrationField {
                    label: "Full name".to_string(),
                    required: true,
                },
                RegistrationField {
                    label: "Roll number".to_string(),
                    required: false,
                },
            ],
            ..Default::default()
        }),
        created_at: base + Duration::days(2),
        updated_at: None,
    };

    let general = Test {
        id: "test-general-knowledge".to_string(),
        title: "General Knowledge".to_string(),
        description: "A short quiz on science, geography and literature.".to_string(),
        questions: questions_general_knowledge(),
        duration: 15,
        marks_per_question: 4.0,
        negative_marks: 0.0,
        is_public: true,
        created_by: Some(DEMO_TEACHER_ID.to_string()),
        settings: None,
        created_at: base,
        updated_at: None,
    };

    let sections = vec![
        Section {
            id: "section-quant".to_string(),
            name: "Quantitative Aptitude".to_string(),
            description: "Numbers, arithmetic and data interpretation.".to_string(),
            created_at: base,
        },
        Section {
            id: "section-reasoning".to_string(),
            name: "Logical Reasoning".to_string(),
            description: "Puzzles, series and analytical reasoning.".to_string(),
            created_at: base,
        },
        Section {
            id: "section-verbal".to_string(),
            name: "Verbal Ability".to_string(),
            description: "Reading comprehension and vocabulary.".to_string(),
            created_at: base,
        },
    ];

    let results = vec![TestResult {
        attempt_id: "attempt-demo-1".to_string(),
        test_id: general.id.clone(),
        user_id: DEMO_STUDENT_ID.to_string(),
        student_name: "Demo Student".to_string(),
        score: Score {
            total_marks: 12.0,
            score: 8.0,
            correct: 2,
            wrong: 1,
            skipped: 0,
            percentage: 66.67,
        },
        submitted_at: base + Duration::days(1),
    }];

    let test_sections = HashMap::from([(math.id.clone(), vec!["section-quant".to_string()])]);

    let likes = HashMap::from([(
        general.id.clone(),
        HashSet::from([DEMO_STUDENT_ID.to_string()]),
    )]);

    Collections {
        tests: vec![math, general],
        sections,
        test_sections,
        results,
        likes,
        feedback: Vec::new(),
    }
}
