// src/mock_api/mod.rs

//! Asynchronous CRUD operations over the [`MemoryStore`](crate::store::MemoryStore).
//!
//! Stands in for the real backend. Every function waits the store's nominal
//! latency and reports failure as an [`AppError`] value.

pub mod feedback_api;
pub mod likes_api;
pub mod results_api;
pub mod sections_api;
pub mod tests_api;

use crate::error::AppError;

pub type ApiResult<T> = Result<T, AppError>;

pub(crate) fn test_not_found() -> AppError {
    AppError::NotFound("Test not found".to_string())
}
