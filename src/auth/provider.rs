// src/auth/provider.rs

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AuthPayload, Role, Session, SignInRequest, SignUpRequest, User, UserUpdate},
    utils::{
        hash::{check_password, hash_password},
        jwt::{sign_jwt, verify_jwt},
    },
};

/// External identity service.
///
/// The session manager only depends on this call shape; where accounts
/// actually live is up to the implementation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthPayload, AppError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthPayload, AppError>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AppError>;

    async fn get_session(&self, access_token: &str) -> Result<Session, AppError>;

    async fn update_user(&self, access_token: &str, update: &UserUpdate) -> Result<User, AppError>;
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    /// `None` for accounts created through passwordless sign-in.
    password_hash: Option<String>,
}

/// In-process identity provider: argon2 password hashes and HS256 access tokens.
pub struct LocalIdentityProvider {
    /// Keyed by email.
    accounts: RwLock<HashMap<String, Account>>,
    /// Token ids (`jti`) that were signed out.
    revoked: RwLock<HashSet<String>>,
    jwt_secret: String,
    jwt_expiration: u64,
    allow_passwordless_sign_in: bool,
}

fn invalid_credentials() -> AppError {
    AppError::AuthError("Invalid login credentials".to_string())
}

impl LocalIdentityProvider {
    pub fn new(jwt_secret: impl Into<String>, jwt_expiration: u64, allow_passwordless_sign_in: bool) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            revoked: RwLock::new(HashSet::new()),
            jwt_secret: jwt_secret.into(),
            jwt_expiration,
            allow_passwordless_sign_in,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.jwt_expiration,
            config.allow_passwordless_sign_in,
        )
    }

    /// Creates an account directly, bypassing the sign-up rules. Used to seed
    /// the admin account at startup. Existing accounts are left alone.
    pub async fn seed_account(&self, email: &str, password: &str, role: Role) -> Result<User, AppError> {
        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts.get(email) {
            return Ok(existing.user.clone());
        }

        let account = Account {
            user: new_user(email, None, None, Some(role)),
            password_hash: Some(hash_password(password)?),
        };
        let user = account.user.clone();
        accounts.insert(email.to_string(), account);
        Ok(user)
    }

    fn issue_session(&self, user: &User) -> Result<AuthPayload, AppError> {
        let (access_token, expires_at) = sign_jwt(user, &self.jwt_secret, self.jwt_expiration)?;
        Ok(AuthPayload {
            user: user.clone(),
            session: Session {
                access_token,
                token_type: "bearer".to_string(),
                expires_at,
                user: user.clone(),
            },
        })
    }

    /// Decodes a token and checks it has not been revoked.
    async fn claims(&self, access_token: &str) -> Result<crate::utils::jwt::Claims, AppError> {
        let claims = verify_jwt(access_token, &self.jwt_secret)?;
        if self.revoked.read().await.contains(&claims.jti) {
            return Err(AppError::AuthError("Session has been revoked".to_string()));
        }
        Ok(claims)
    }
}

fn new_user(email: &str, name: Option<String>, designation: Option<String>, role: Option<Role>) -> User {
    User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        name,
        designation,
        role,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthPayload, AppError> {
        request.validate()?;
        let password = request.password.as_deref().filter(|p| !p.is_empty());

        let mut accounts = self.accounts.write().await;
        let user = match accounts.get(&request.email) {
            Some(account) => {
                if !check_password(account.password_hash.as_deref(), password)? {
                    return Err(invalid_credentials());
                }
                account.user.clone()
            }
            None if self.allow_passwordless_sign_in => {
                let password_hash = password.map(hash_password).transpose()?;
                let account = Account {
                    user: new_user(&request.email, None, None, None),
                    password_hash,
                };
                let user = account.user.clone();
                accounts.insert(request.email.clone(), account);
                tracing::info!(user_id = %user.id, "Created account on first sign-in");
                user
            }
            None => return Err(invalid_credentials()),
        };

        self.issue_session(&user)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthPayload, AppError> {
        request.validate()?;
        if request.role == Some(Role::Admin) {
            return Err(AppError::Validation(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&request.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                request.email
            )));
        }

        let account = Account {
            user: new_user(
                &request.email,
                request.name.clone(),
                request.designation.clone(),
                request.role.clone(),
            ),
            password_hash: request.password.as_deref().map(hash_password).transpose()?,
        };
        let user = account.user.clone();
        accounts.insert(request.email.clone(), account);
        tracing::info!(user_id = %user.id, "Registered user");

        self.issue_session(&user)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let claims = self.claims(access_token).await?;
        self.revoked.write().await.insert(claims.jti);
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<Session, AppError> {
        let claims = self.claims(access_token).await?;
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(&claims.email)
            .filter(|a| a.user.id == claims.sub)
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        Ok(Session {
            access_token: access_token.to_string(),
            token_type: "bearer".to_string(),
            expires_at: claims.expires_at(),
            user: account.user.clone(),
        })
    }

    async fn update_user(&self, access_token: &str, update: &UserUpdate) -> Result<User, AppError> {
        update.validate()?;
        let claims = self.claims(access_token).await?;

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&claims.email)
            .filter(|a| a.user.id == claims.sub)
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        if let Some(name) = &update.name {
            account.user.name = Some(name.clone());
        }
        if let Some(designation) = &update.designation {
            account.user.designation = Some(designation.clone());
        }
        if let Some(password) = &update.password {
            account.password_hash = Some(hash_password(password)?);
        }

        Ok(account.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new("test-secret", 600, true)
    }

    fn sign_in(email: &str, password: Option<&str>) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn passwordless_sign_in_creates_then_reuses_account() {
        let provider = provider();
        let first = provider.sign_in(&sign_in("amy@school.org", None)).await.unwrap();
        let second = provider.sign_in(&sign_in("amy@school.org", None)).await.unwrap();
        assert_eq!(first.user.id, second.user.id);
        assert_ne!(first.session.access_token, second.session.access_token);
    }

    #[tokio::test]
    async fn empty_password_counts_as_passwordless() {
        let provider = provider();
        let first = provider.sign_in(&sign_in("cara@school.org", Some(""))).await.unwrap();
        let again = provider.sign_in(&sign_in("cara@school.org", None)).await.unwrap();
        assert_eq!(first.user.id, again.user.id);

        // A hashed account still refuses an empty password.
        provider
            .seed_account("dev@school.org", "hunter22", Role::Student)
            .await
            .unwrap();
        let err = provider.sign_in(&sign_in("dev@school.org", Some(""))).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn strict_provider_rejects_unknown_email() {
        let provider = LocalIdentityProvider::new("test-secret", 600, false);
        let err = provider.sign_in(&sign_in("who@school.org", None)).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn password_is_checked_for_registered_accounts() {
        let provider = provider();
        provider
            .sign_up(&SignUpRequest {
                email: "ben@school.org".to_string(),
                password: Some("hunter22".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(provider.sign_in(&sign_in("ben@school.org", Some("hunter22"))).await.is_ok());
        assert!(provider.sign_in(&sign_in("ben@school.org", Some("wrong"))).await.is_err());
        assert!(provider.sign_in(&sign_in("ben@school.org", None)).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_sign_up_conflicts() {
        let provider = provider();
        let request = SignUpRequest {
            email: "cat@school.org".to_string(),
            ..Default::default()
        };
        provider.sign_up(&request).await.unwrap();
        let err = provider.sign_up(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn self_registered_admin_is_rejected() {
        let err = provider()
            .sign_up(&SignUpRequest {
                email: "x@school.org".to_string(),
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn sign_out_revokes_the_token() {
        let provider = provider();
        let payload = provider.sign_in(&sign_in("dan@school.org", None)).await.unwrap();
        let token = payload.session.access_token;

        assert_eq!(provider.get_session(&token).await.unwrap().user, payload.user);
        provider.sign_out(&token).await.unwrap();
        assert!(provider.get_session(&token).await.is_err());
    }

    #[tokio::test]
    async fn update_user_changes_profile() {
        let provider = provider();
        let payload = provider.sign_in(&sign_in("eve@school.org", None)).await.unwrap();
        let update = UserUpdate {
            name: Some("Eve".to_string()),
            ..Default::default()
        };
        let user = provider
            .update_user(&payload.session.access_token, &update)
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Eve"));
        assert_eq!(user.id, payload.user.id);
    }

    #[tokio::test]
    async fn invalid_email_is_a_validation_error() {
        let err = provider().sign_in(&sign_in("not-an-email", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
