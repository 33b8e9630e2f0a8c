// src/models/question.rs

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Label of a multiple-choice option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];
}

/// A single multiple-choice question inside a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the owning test.
    pub id: String,

    /// The prompt shown to the student.
    pub text: String,

    /// Option text keyed by label. Always exactly A–D.
    pub options: BTreeMap<OptionLabel, String>,

    /// Must be one of the keys in `options`.
    pub correct_answer: OptionLabel,
}

impl Question {
    pub fn has_option(&self, label: OptionLabel) -> bool {
        self.options.contains_key(&label)
    }
}

/// DTO for sending a question to a student (excludes the answer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub text: String,
    pub options: BTreeMap<OptionLabel, String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            id: q.id.clone(),
            text: q.text.clone(),
            options: q.options.clone(),
        }
    }
}

/// Checks the question invariants for a whole test.
pub fn validate_questions(questions: &[Question]) -> Result<(), AppError> {
    let mut seen = HashSet::new();

    for q in questions {
        if q.id.trim().is_empty() {
            return Err(AppError::Validation("Question id cannot be empty".to_string()));
        }
        if !seen.insert(q.id.as_str()) {
            return Err(AppError::Validation(format!("Duplicate question id '{}'", q.id)));
        }
        if q.text.trim().is_empty() || q.text.len() > 1000 {
            return Err(AppError::Validation(format!(
                "Question '{}' text must be between 1 and 1000 characters",
                q.id
            )));
        }
        if OptionLabel::ALL.iter().any(|label| !q.has_option(*label)) {
            return Err(AppError::Validation(format!(
                "Question '{}' must have options A, B, C and D",
                q.id
            )));
        }
        for opt in q.options.values() {
            if opt.trim().is_empty() || opt.len() > 500 {
                return Err(AppError::Validation(format!(
                    "Question '{}' has an empty or oversized option",
                    q.id
                )));
            }
        }
        if !q.has_option(q.correct_answer) {
            return Err(AppError::Validation(format!(
                "Question '{}' correct answer is not one of its options",
                q.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: "2 + 2 = ?".to_string(),
            options: BTreeMap::from([
                (OptionLabel::A, "3".to_string()),
                (OptionLabel::B, "4".to_string()),
                (OptionLabel::C, "5".to_string()),
                (OptionLabel::D, "22".to_string()),
            ]),
            correct_answer: OptionLabel::B,
        }
    }

    #[test]
    fn accepts_well_formed_questions() {
        assert!(validate_questions(&[question("q1"), question("q2")]).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate_questions(&[question("q1"), question("q1")]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn rejects_missing_option() {
        let mut q = question("q1");
        q.options.remove(&OptionLabel::D);
        assert!(validate_questions(&[q]).is_err());
    }

    #[test]
    fn options_serialize_with_letter_keys() {
        let value = serde_json::to_value(question("q1")).unwrap();
        assert_eq!(value["options"]["B"], "4");
        assert_eq!(value["correct_answer"], "B");
    }
}
