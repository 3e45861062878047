//! Verdict Core Library
//!
//! Foundational utilities for the verdict pipeline:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Environment-first configuration

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, VectorBackend};
pub use error::{AppError, AppResult};
