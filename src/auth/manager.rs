// src/auth/manager.rs

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    auth::{
        provider::IdentityProvider,
        storage::{DurableStorage, SESSION_KEY, USER_KEY},
    },
    error::AppError,
    models::user::{AuthPayload, Session, SignInRequest, SignUpRequest, User, UserUpdate},
};

/// Snapshot of the signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<Session>,
    /// True until [`AuthManager::initialize`] has run.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            session: None,
            loading: true,
        }
    }
}

/// Client-side session manager.
///
/// Owns the in-memory identity, keeps it in step with durable storage, and
/// talks to the identity provider. Construct one and hand it by reference to
/// whatever needs the current user; there is no global instance.
pub struct AuthManager {
    provider: Arc<dyn IdentityProvider>,
    storage: Arc<dyn DurableStorage>,
    state: RwLock<AuthState>,
}

impl AuthManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            provider,
            storage,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Rehydrates identity from durable storage.
    ///
    /// A missing, unparsable or mismatched record leaves the manager signed
    /// out and clears whatever half of the pair was left behind. Never fails.
    pub async fn initialize(&self) -> AuthState {
        let mut state = self.state.write().await;
        let restored = self.load_persisted().await;

        if restored.is_none() {
            if let Err(e) = self.storage.remove_items(&[USER_KEY, SESSION_KEY]).await {
                tracing::warn!("Failed to clear stale auth records: {}", e);
            }
        }

        *state = match restored {
            Some((user, session)) => {
                tracing::debug!(user_id = %user.id, "Restored session from storage");
                AuthState {
                    user: Some(user),
                    session: Some(session),
                    loading: false,
                }
            }
            None => AuthState {
                user: None,
                session: None,
                loading: false,
            },
        };
        state.clone()
    }

    async fn load_persisted(&self) -> Option<(User, Session)> {
        let user = self.read_record::<User>(USER_KEY).await?;
        let session = self.read_record::<Session>(SESSION_KEY).await?;

        if session.user.id != user.id {
            tracing::warn!("Persisted session belongs to a different user, ignoring");
            return None;
        }
        Some((user, session))
    }

    async fn read_record<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Corrupt {} record, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// Signs in through the provider.
    ///
    /// On failure the in-memory state and stored records are untouched.
    pub async fn sign_in(&self, email: &str, password: Option<&str>) -> Result<AuthPayload, AppError> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.map(str::to_string),
        };
        let payload = self.provider.sign_in(&request).await?;
        self.establish(&payload).await?;
        Ok(payload)
    }

    /// Registers through the provider and signs the new account in.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthPayload, AppError> {
        let payload = self.provider.sign_up(&request).await?;
        self.establish(&payload).await?;
        Ok(payload)
    }

    /// Writes both records, then swaps the in-memory state.
    ///
    /// The state lock is held across the write so concurrent sign-ins leave
    /// memory and storage on the same user.
    async fn establish(&self, payload: &AuthPayload) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        self.persist(&payload.user, &payload.session).await?;

        state.user = Some(payload.user.clone());
        state.session = Some(payload.session.clone());
        state.loading = false;

        tracing::info!(user_id = %payload.user.id, "Signed in");
        Ok(())
    }

    async fn persist(&self, user: &User, session: &Session) -> Result<(), AppError> {
        let user_json = serde_json::to_string(user)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        let session_json = serde_json::to_string(session)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        self.storage
            .set_items(&[(USER_KEY, user_json), (SESSION_KEY, session_json)])
            .await
    }

    /// Signs out locally no matter what the provider says.
    ///
    /// Provider and storage failures are logged, never returned.
    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        let token = state.session.as_ref().map(|s| s.access_token.clone());

        if let Some(token) = token {
            if let Err(e) = self.provider.sign_out(&token).await {
                tracing::warn!("Provider sign-out failed, clearing local session anyway: {}", e);
            }
        }

        if let Err(e) = self.storage.remove_items(&[USER_KEY, SESSION_KEY]).await {
            tracing::warn!("Failed to remove persisted session: {}", e);
        }

        state.user = None;
        state.session = None;
        state.loading = false;
        tracing::info!("Signed out");
    }

    /// Updates the profile through the provider and refreshes the stored pair.
    pub async fn update_profile(&self, update: UserUpdate) -> Result<User, AppError> {
        let session = self
            .session()
            .await
            .ok_or_else(|| AppError::AuthError("Not signed in".to_string()))?;

        let user = self.provider.update_user(&session.access_token, &update).await?;

        let mut state = self.state.write().await;
        // A sign-out or another sign-in raced the provider call.
        let current_token = state.session.as_ref().map(|s| s.access_token.as_str());
        if current_token != Some(session.access_token.as_str()) {
            return Err(AppError::AuthError("Session changed during update".to_string()));
        }
        let session = Session {
            user: user.clone(),
            ..session
        };
        self.persist(&user, &session).await?;

        state.user = Some(user.clone());
        state.session = Some(session);
        Ok(user)
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Admin/teacher flag, derived from the current user on every call.
    pub async fn is_privileged(&self) -> bool {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .is_some_and(User::is_privileged)
    }
}
