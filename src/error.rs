// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global Application Error Enum.
/// Every mock API and auth operation reports failure through this type
/// instead of panicking; callers decide how to surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // 400 Bad Request, e.g. missing rating on feedback
    Validation(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate email)
    Conflict(String),

    // 502 Bad Gateway: identity or storage provider failure, message passed through
    Provider(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

/// Wire form of an error inside the `{data, error}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::AuthError(_) => "auth",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Provider(_) => "provider",
            AppError::InternalServerError(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Provider(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to clients. Internal details never leave the process.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            AppError::InternalServerError(_) => "Internal Server Error".to_string(),
            other => other.message().to_string(),
        };
        ErrorBody {
            kind: self.kind().to_string(),
            message,
        }
    }

    /// Rebuilds an error received over the wire.
    pub fn from_body(body: ErrorBody) -> Self {
        let ErrorBody { kind, message } = body;
        match kind.as_str() {
            "validation" => AppError::Validation(message),
            "auth" => AppError::AuthError(message),
            "forbidden" => AppError::Forbidden(message),
            "not_found" => AppError::NotFound(message),
            "conflict" => AppError::Conflict(message),
            "internal" => AppError::InternalServerError(message),
            _ => AppError::Provider(message),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a `{data: null, error: {...}}` JSON response
/// with the matching HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::InternalServerError(msg) = &self {
            tracing::error!("Internal Server Error: {}", msg);
        }
        let body = Json(serde_json::json!({
            "data": null,
            "error": self.to_body(),
        }));

        (self.status(), body).into_response()
    }
}

/// Malformed or mistyped request bodies.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Storage backends surface as provider failures.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}
