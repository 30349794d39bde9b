//! Error types for tango-core.

use thiserror::Error;

/// Vocabulary import failures. An import either installs the entire
/// word list or rejects it wholesale; there is no partial import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid vocabulary format: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A persistence operation failed. Carries the backend's message;
/// the dispatcher reports it and continues, it is never fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
