// src/lib.rs
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use auth::AuthenticatedUser;
pub use error::{AppError, AppResult};
