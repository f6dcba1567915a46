//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every failure leaving the service layer is one of these four kinds. The
/// message is safe to show to API callers: backend and filesystem details
/// are logged where the error is created and never carried in here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Caller supplied an unusable combination of inputs.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The storage backend confirmed the key does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A local filesystem operation failed.
    #[error("I/O failure: {0}")]
    IoFailure(String),

    /// Any other backend or unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an I/O failure error.
    #[must_use]
    pub fn io_failure(msg: impl Into<String>) -> Self {
        Self::IoFailure(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::NotFound(_) => 404,
            Self::IoFailure(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for logs and API clients.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::IoFailure(_) => "IO_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the caller-facing message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(msg)
            | Self::NotFound(msg)
            | Self::IoFailure(msg)
            | Self::Internal(msg) => msg,
        }
    }
}
