// src/utils/guard.rs

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};

use crate::{
    auth::IdentityProvider,
    error::AppError,
    models::user::{Session, User},
};

/// Caller resolved from the `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing or the provider does not
/// recognise the token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: Session,
}

impl CurrentUser {
    pub fn user(&self) -> &User {
        &self.session.user
    }

    pub fn id(&self) -> &str {
        &self.session.user.id
    }

    pub fn access_token(&self) -> &str {
        &self.session.access_token
    }
}

/// A [`CurrentUser`] who may manage tests and sections. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct PrivilegedUser(pub CurrentUser);

pub fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<dyn IdentityProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let provider = Arc::<dyn IdentityProvider>::from_ref(state);

        let session = provider.get_session(&token).await?;
        Ok(Self { session })
    }
}

/// `Option<CurrentUser>`: `None` when no `Authorization` header was sent.
/// A header carrying a bad token is still rejected.
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    Arc<dyn IdentityProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

impl<S> FromRequestParts<S> for PrivilegedUser
where
    Arc<dyn IdentityProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        if !current.user().is_privileged() {
            tracing::debug!(user_id = %current.id(), "Privileged route refused");
            return Err(AppError::Forbidden(
                "Only teachers and admins can do this".to_string(),
            ));
        }
        Ok(Self(current))
    }
}
