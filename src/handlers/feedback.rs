// src/handlers/feedback.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    mock_api::feedback_api,
    models::feedback::NewFeedback,
    response::ApiResponse,
    store::MemoryStore,
    utils::{extract::Json, guard::CurrentUser},
};

/// Rates a test. The comment is sanitized before it is stored.
pub async fn submit_feedback(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(test_id): Path<String>,
    Json(payload): Json<NewFeedback>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = feedback_api::submit_feedback(&store, &test_id, current.id(), payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::Data(feedback)))
}

pub async fn list_feedback(
    State(store): State<MemoryStore>,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = feedback_api::fetch_feedback(&store, &test_id).await?;
    Ok(ApiResponse::Data(feedback))
}
