// src/auth/mod.rs

//! Identity: the provider boundary, durable session storage and the
//! client-side session manager that ties them together.

pub mod manager;
pub mod provider;
pub mod remote;
pub mod storage;

pub use manager::{AuthManager, AuthState};
pub use provider::{IdentityProvider, LocalIdentityProvider};
pub use remote::HttpIdentityProvider;
pub use storage::{DurableStorage, MemoryStorage, SESSION_KEY, SqliteStorage, USER_KEY};
