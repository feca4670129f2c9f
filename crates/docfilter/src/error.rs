//! Error types for the docfilter crate.
//!
//! Translation itself never fails. These errors come from the edges: loading
//! filter lists and options from JSON.

use thiserror::Error;

/// Errors that can occur when loading filters or options.
#[derive(Debug, Error)]
pub enum DocFilterError {
    /// A clause carries neither a `path` nor a `property`.
    #[error("invalid filter clause: {0}")]
    InvalidClause(String),

    /// Malformed JSON input.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read input.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl DocFilterError {
    /// Create an invalid-clause error.
    pub fn invalid_clause(msg: impl Into<String>) -> Self {
        Self::InvalidClause(msg.into())
    }
}

/// Result type for docfilter operations.
pub type Result<T> = std::result::Result<T, DocFilterError>;
