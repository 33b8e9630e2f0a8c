// src/models/result.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::OptionLabel;

/// Marks breakdown for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    pub total_marks: f64,
    pub score: f64,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    /// `score / total_marks * 100`, rounded to two decimals.
    pub percentage: f64,
}

/// The recorded outcome of one user completing one test.
/// Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub attempt_id: String,
    pub test_id: String,
    pub user_id: String,
    pub student_name: String,
    #[serde(flatten)]
    pub score: Score,
    pub submitted_at: DateTime<Utc>,
}

/// DTO for submitting a finished attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(length(min = 1, max = 100))]
    pub student_name: Option<String>,

    /// User's answers map.
    /// Key: Question ID
    /// Value: selected option label
    #[serde(default)]
    pub answers: HashMap<String, OptionLabel>,
}
