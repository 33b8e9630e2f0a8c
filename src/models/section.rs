// src/models/section.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named grouping of tests (e.g. "Quantitative Aptitude").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewSection {
    #[validate(length(min = 1, max = 100, message = "Section name must be between 1 and 100 chars"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for updating a section. Fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SectionPatch {
    #[validate(length(min = 1, max = 100, message = "Section name must be between 1 and 100 chars"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for replacing the sections attached to a test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignSectionsRequest {
    pub section_ids: Vec<String>,
}
