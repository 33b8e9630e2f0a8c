// src/handlers/results.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    mock_api::{results_api, tests_api},
    models::result::SubmitAttemptRequest,
    response::ApiResponse,
    store::MemoryStore,
    utils::{extract::Json, guard::CurrentUser},
};

/// Submits a finished attempt.
///
/// Scores the answers against the stored answer key and records the result.
/// The student name defaults to the caller's profile name, then their email.
pub async fn submit_attempt(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(test_id): Path<String>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = current.user();
    let student_name = payload
        .student_name
        .clone()
        .or_else(|| user.name.clone())
        .unwrap_or_else(|| user.email.clone());

    let result =
        results_api::record_result(&store, &test_id, &user.id, &student_name, &payload.answers)
            .await?;

    Ok((StatusCode::CREATED, ApiResponse::Data(result)))
}

/// All results for a test. Visible to the test's creator and privileged users.
pub async fn list_test_results(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let test = tests_api::fetch_test_by_id(&store, &test_id).await?;
    if !test.is_managed_by(current.user()) {
        return Err(AppError::Forbidden(
            "Only the creator can view these results".to_string(),
        ));
    }

    let results = results_api::fetch_results_by_test(&store, &test_id).await?;
    Ok(ApiResponse::Data(results))
}

/// A user's own results. Privileged users may look up anyone.
pub async fn list_user_results(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if current.id() != user_id && !current.user().is_privileged() {
        return Err(AppError::Forbidden(
            "You can only view your own results".to_string(),
        ));
    }

    let results = results_api::fetch_results_by_user(&store, &user_id).await?;
    Ok(ApiResponse::Data(results))
}
