// src/models/mod.rs

pub mod feedback;
pub mod question;
pub mod result;
pub mod section;
pub mod user;
