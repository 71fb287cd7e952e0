//! Tool error types.

use rewind_history::HistoryError;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unknown tool ID.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Undo history error, including access denials.
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ToolError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an execution failed error.
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_is_transparent() {
        let err: ToolError = HistoryError::Disabled.into();
        assert_eq!(err.to_string(), "Undo functionality is disabled");
    }

    #[test]
    fn test_constructor_messages() {
        assert_eq!(
            ToolError::validation("filePath is required").to_string(),
            "Validation error: filePath is required"
        );
        assert_eq!(
            ToolError::file_not_found("/tmp/a.txt").to_string(),
            "File not found: /tmp/a.txt"
        );
        assert_eq!(
            ToolError::UnknownTool("bash".into()).to_string(),
            "Unknown tool: bash"
        );
    }

    #[test]
    fn test_access_denied_converts() {
        let err: ToolError = HistoryError::access_denied("outside").into();
        assert!(matches!(
            err,
            ToolError::History(HistoryError::AccessDenied(_))
        ));
    }
}
