// src/handlers/likes.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError, mock_api::likes_api, response::ApiResponse, store::MemoryStore,
    utils::guard::CurrentUser,
};

/// Toggles the caller's like on a test.
///
/// Returns the new state: `{ "liked": bool, "count": n }`.
pub async fn toggle_like(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let toggled = likes_api::toggle_test_like(&store, &test_id, current.id()).await?;
    Ok(ApiResponse::Data(toggled))
}

pub async fn like_count(
    State(store): State<MemoryStore>,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let count = likes_api::get_test_like_count(&store, &test_id).await?;
    Ok(ApiResponse::Data(count))
}

pub async fn like_status(
    State(store): State<MemoryStore>,
    current: CurrentUser,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let liked = likes_api::get_test_like_status(&store, &test_id, current.id()).await?;
    Ok(ApiResponse::Data(liked))
}
