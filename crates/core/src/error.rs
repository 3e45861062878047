//! Error types for the verdict pipeline.
//!
//! A single unified enum covers every failure category. Fetch, parse, and
//! configuration errors are fatal to a whole pipeline run because every
//! question depends on the shared document and index; generation errors are
//! scoped to the one question whose backend call failed.

use thiserror::Error;

/// Unified error type for the verdict pipeline.
///
/// All fallible functions return `Result<T, AppError>`. We never panic —
/// errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (bad backend selection, missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or HTTP failure while fetching the source document
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Document bytes could not be parsed for the detected format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Vector index build or query errors
    #[error("Index error: {0}")]
    Index(String),

    /// Generative backend failure for a single question
    #[error("Generation error: {0}")]
    Generation(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Whether this error aborts the whole pipeline run.
    ///
    /// Only generation failures are recoverable: the owning question degrades
    /// to a fallback answer while its siblings continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Generation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_errors_are_not_fatal() {
        assert!(!AppError::Generation("backend down".to_string()).is_fatal());
    }

    #[test]
    fn test_prerequisite_errors_are_fatal() {
        assert!(AppError::Fetch("connection refused".to_string()).is_fatal());
        assert!(AppError::Parse("truncated xref table".to_string()).is_fatal());
        assert!(AppError::Config("unknown backend".to_string()).is_fatal());
        assert!(AppError::Index("dimension mismatch".to_string()).is_fatal());
    }
}
