use std::sync::Arc;

use axum::extract::FromRef;

use crate::{auth::IdentityProvider, config::Config, store::MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub config: Config,
    pub identity: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for MemoryStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn IdentityProvider> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.identity)
    }
}
