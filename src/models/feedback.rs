// src/models/feedback.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A rating left by a user after taking a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub test_id: String,
    pub user_id: String,
    /// 1 to 5 stars.
    pub rating: u8,
    /// Sanitized HTML.
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for submitting feedback. A rating of 0 means "not selected".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewFeedback {
    #[serde(default)]
    pub rating: u8,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}
