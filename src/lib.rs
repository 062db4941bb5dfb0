//! Reading Settings - word-by-word reading preferences with optimistic persistence

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use services::{Session, UpdateCoordinator, WordByWordController};
pub use types::*;
