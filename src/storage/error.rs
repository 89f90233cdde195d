//! Storage error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur while reading or writing the entry document
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller supplied a value that is not a JSON array
    #[error("Expected array data, got {0}")]
    NotAnArray(&'static str),

    /// Stored document is valid JSON but not an array
    #[error("Corrupt document: {0}")]
    Corruption(String),

    /// HTTP transport error talking to the remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store did not answer in time
    #[error("Remote store request timed out")]
    Timeout,

    /// Remote store could not be reached
    #[error("Remote store unavailable")]
    Unavailable,

    /// Remote store answered with an unexpected status
    #[error("Remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl StorageError {
    /// The backend answered but the stored document itself is unusable
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            StorageError::Corruption(_) | StorageError::Serialization(_)
        )
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
