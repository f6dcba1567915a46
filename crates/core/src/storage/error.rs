//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Backend answered with a non-success status other than "not found".
    #[error("storage backend rejected the request: {0}")]
    Rejected(String),

    /// Local destination file could not be created or written.
    #[error("local I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a rejected error.
    #[must_use]
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Classify an OpenDAL error raised while operating on `key`.
    #[must_use]
    pub fn from_opendal(err: &opendal::Error, key: &str) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(key),
            opendal::ErrorKind::PermissionDenied
            | opendal::ErrorKind::RateLimited
            | opendal::ErrorKind::ConditionNotMatch => Self::Rejected(err.to_string()),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }

    /// Classify an I/O error surfaced by an OpenDAL byte stream.
    ///
    /// These come from the backend, not the local disk, so they never map
    /// to [`StorageError::Io`].
    #[must_use]
    pub fn from_stream(err: &std::io::Error, key: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(key),
            std::io::ErrorKind::PermissionDenied => Self::Rejected(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}
