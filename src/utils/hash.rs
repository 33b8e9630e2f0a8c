// src/utils/hash.rs

//! Account password hashing.
//!
//! Accounts created by passwordless sign-in carry no hash at all, so
//! checking a credential is a question about an optional stored hash and an
//! optional supplied password.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hashes a password with Argon2 and a fresh random salt.
///
/// An empty password means "no password" elsewhere, so it is never hashed.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Decides whether `supplied` unlocks an account holding `stored`.
///
/// | stored | supplied | result              |
/// |--------|----------|---------------------|
/// | none   | any      | accepted            |
/// | hash   | none     | rejected            |
/// | hash   | password | Argon2 verification |
///
/// A stored hash that is not a PHC string is an internal error.
pub fn check_password(stored: Option<&str>, supplied: Option<&str>) -> Result<bool, AppError> {
    let Some(stored) = stored else {
        return Ok(true);
    };
    let Some(supplied) = supplied else {
        return Ok(false);
    };

    let parsed = PasswordHash::new(stored).map_err(|e| {
        tracing::error!("Stored password hash is malformed: {}", e);
        AppError::InternalServerError("Stored credential is unreadable".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(supplied.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_account_needs_its_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(check_password(Some(&hash), Some("correct horse")).unwrap());
        assert!(!check_password(Some(&hash), Some("battery staple")).unwrap());
        assert!(!check_password(Some(&hash), None).unwrap());
    }

    #[test]
    fn passwordless_account_accepts_anything() {
        assert!(check_password(None, None).unwrap());
        assert!(check_password(None, Some("whatever")).unwrap());
    }

    #[test]
    fn empty_password_is_never_hashed() {
        let err = hash_password("").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let err = check_password(Some("not-a-phc-string"), Some("x")).unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }
}
