// src/lib.rs

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod likes;
pub mod mock_api;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod test_session;
pub mod utils;

// Re-export specific items for convenience if needed
pub use routes::create_router;
