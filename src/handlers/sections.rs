// src/handlers/sections.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    mock_api::sections_api,
    models::section::{AssignSectionsRequest, NewSection, SectionPatch},
    response::ApiResponse,
    store::MemoryStore,
    utils::{extract::Json, guard::PrivilegedUser},
};

pub async fn list_sections(State(store): State<MemoryStore>) -> Result<impl IntoResponse, AppError> {
    let sections = sections_api::fetch_sections(&store).await?;
    Ok(ApiResponse::Data(sections))
}

/// Creates a section (Teacher/Admin only).
pub async fn create_section(
    State(store): State<MemoryStore>,
    PrivilegedUser(current): PrivilegedUser,
    Json(payload): Json<NewSection>,
) -> Result<impl IntoResponse, AppError> {
    let section = sections_api::create_section(&store, payload).await?;
    tracing::info!(user_id = %current.id(), section_id = %section.id, "Section created");
    Ok((StatusCode::CREATED, ApiResponse::Data(section)))
}

pub async fn update_section(
    State(store): State<MemoryStore>,
    _: PrivilegedUser,
    Path(id): Path<String>,
    Json(payload): Json<SectionPatch>,
) -> Result<impl IntoResponse, AppError> {
    let section = sections_api::update_section(&store, &id, payload).await?;
    Ok(ApiResponse::Data(section))
}

/// Deletes a section and detaches it from every test. Deleting an unknown
/// section succeeds.
pub async fn delete_section(
    State(store): State<MemoryStore>,
    _: PrivilegedUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ApiResponse::done(sections_api::delete_section(&store, &id).await)
}

pub async fn list_test_sections(
    State(store): State<MemoryStore>,
    Path(test_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let sections = sections_api::fetch_test_sections(&store, &test_id).await?;
    Ok(ApiResponse::Data(sections))
}

/// Replaces the set of sections attached to a test.
pub async fn assign_sections(
    State(store): State<MemoryStore>,
    _: PrivilegedUser,
    Path(test_id): Path<String>,
    Json(payload): Json<AssignSectionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sections =
        sections_api::assign_sections_to_test(&store, &test_id, payload.section_ids).await?;
    Ok(ApiResponse::Data(sections))
}
