// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role metadata attached to a user account.
/// Unknown strings are preserved as `Other` so nothing is lost on a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Other(other) => other,
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            "student" => Role::Student,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Elevated privilege rule shared by the session manager and the HTTP guards.
///
/// Plain substring match on the email, no case folding.
pub fn is_privileged(email: &str, role: Option<&Role>) -> bool {
    email.contains("admin") || email.contains("teacher") || role.is_some_and(Role::is_privileged)
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    pub email: String,

    pub name: Option<String>,

    /// Free-form job title entered at sign-up (e.g. "Lecturer").
    pub designation: Option<String>,

    pub role: Option<Role>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_privileged(&self) -> bool {
        is_privileged(&self.email, self.role.as_ref())
    }
}

/// Active credential for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// What sign-in and sign-up hand back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub session: Session,
}

/// DTO for signing in. The password is optional for passwordless accounts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    /// An empty string counts as no password.
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

/// DTO for creating a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: Option<String>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
    pub role: Option<Role>,
}

/// DTO for profile updates. Fields left out stay as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
    #[validate(length(min = 4, max = 128))]
    pub password: Option<String>,
}
