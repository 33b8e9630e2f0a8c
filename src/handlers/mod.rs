// src/handlers/mod.rs

pub mod auth;
pub mod feedback;
pub mod likes;
pub mod results;
pub mod sections;
