// src/utils/jwt.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::user::{Role, User, is_privileged},
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject - the user id.
    pub sub: String,
    pub email: String,
    pub role: Option<Role>,
    /// Token id, lets a single token be revoked.
    pub jti: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn is_privileged(&self) -> bool {
        is_privileged(&self.email, self.role.as_ref())
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Signs a new access token for the user.
///
/// Returns the token together with its expiry instant.
pub fn sign_jwt(
    user: &User,
    secret: &str,
    expiration_seconds: u64,
) -> Result<(String, DateTime<Utc>), AppError> {
    let expires_at = Utc::now() + Duration::seconds(expiration_seconds as i64);

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        jti: uuid::Uuid::new_v4().to_string(),
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((token, claims.expires_at()))
}

/// Decodes an access token.
///
/// An expired token is reported separately from a forged or garbled one so
/// clients know to sign in again rather than discard the session as bogus.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::AuthError("Session expired".to_string()),
        kind => {
            tracing::debug!(?kind, "Rejected access token");
            AppError::AuthError("Invalid token".to_string())
        }
    })
}
