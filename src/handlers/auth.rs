// src/handlers/auth.rs

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    auth::IdentityProvider,
    error::AppError,
    models::user::{SignInRequest, SignUpRequest, UserUpdate},
    response::ApiResponse,
    utils::{extract::Json, guard::CurrentUser},
};

/// Registers a new account and opens a session for it.
///
/// Returns 201 Created with `{user, session}`.
pub async fn sign_up(
    State(identity): State<Arc<dyn IdentityProvider>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = identity.sign_up(&payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::Data(auth)))
}

/// Authenticates by email and optional password.
pub async fn sign_in(
    State(identity): State<Arc<dyn IdentityProvider>>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = identity.sign_in(&payload).await.inspect_err(|e| {
        tracing::debug!(email = %payload.email, "Sign-in refused: {}", e);
    })?;
    Ok(ApiResponse::Data(auth))
}

/// Revokes the caller's token.
pub async fn sign_out(
    State(identity): State<Arc<dyn IdentityProvider>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    identity.sign_out(current.access_token()).await?;
    tracing::info!(user_id = %current.id(), "Signed out");
    Ok(ApiResponse::<()>::Done)
}

/// Returns the session behind the bearer token.
pub async fn get_session(current: CurrentUser) -> impl IntoResponse {
    ApiResponse::Data(current.session)
}

/// Updates the caller's profile fields.
pub async fn update_user(
    State(identity): State<Arc<dyn IdentityProvider>>,
    current: CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = identity
        .update_user(current.access_token(), &payload)
        .await?;
    Ok(ApiResponse::Data(user))
}
