//! History error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur while recording, reverting or listing history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Undo history was switched off in the configuration.
    #[error("Undo functionality is disabled")]
    Disabled,

    /// No operations are recorded for the file.
    #[error("No undo operations available for: {0}")]
    NoHistory(String),

    /// The path lies outside the allowed directories.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The inverse filesystem action failed. History is left unchanged.
    #[error("Failed to undo operation for {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path cannot identify a tracked file.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The configuration is invalid or unreadable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HistoryError {
    /// Create a no history error.
    pub fn no_history(path: impl std::fmt::Display) -> Self {
        Self::NoHistory(path.to_string())
    }

    /// Create an access denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied(message.into())
    }

    /// Create an I/O failure error.
    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_no_history_message() {
        let err = HistoryError::no_history("/tmp/a.txt");
        assert_eq!(err.to_string(), "No undo operations available for: /tmp/a.txt");
    }

    #[test]
    fn test_io_failure_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = HistoryError::io_failure("/tmp/a.txt", io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/tmp/a.txt"));
        assert!(err.to_string().contains("read-only"));
    }
}
