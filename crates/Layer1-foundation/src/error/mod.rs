//! Error types for BLNT
//!
//! Every crate in the workspace reports failures through this one enum.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// BLNT error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // Task / Agent
    // ========================================================================
    #[error("Unrecognized task type: {0}")]
    UnrecognizedTaskType(String),

    #[error("Task error: {0}")]
    Task(String),

    /// Failure raised by a capability executor. Displays the message verbatim.
    #[error("{0}")]
    Executor(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // Provider
    // ========================================================================
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // ========================================================================
    // General
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // External conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Errors worth retrying once a retry policy exists
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout(_) | Error::Http(_))
    }

    /// Errors that can be shown to the user as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidInput(_)
                | Error::Validation(_)
                | Error::UnrecognizedTaskType(_)
                | Error::Executor(_)
        )
    }

    /// Executor failure helper
    pub fn executor(message: impl Into<String>) -> Self {
        Error::Executor(message.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
