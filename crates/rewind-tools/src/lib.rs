//! Tool implementations for rewind.
//!
//! The mutating tools (`write`, `edit`, `multiedit`) record every change
//! they make in the undo history, and the `undo` tool reverts or lists it.

pub mod error;
pub mod mutation;
pub mod registry;

// Tool implementations
pub mod edit;
pub mod multiedit;
pub mod undo;
pub mod write;

pub use error::{ToolError, ToolResult};
pub use mutation::PendingMutation;
pub use registry::ToolRegistry;

use async_trait::async_trait;
use rewind_history::{
    AccessControl, FileIo, FileKey, HistoryQuery, OperationRecorder, Registry, RevertEngine,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Context provided to tools during execution.
pub struct ToolContext {
    /// Project root directory.
    pub root_dir: PathBuf,
    /// Current working directory.
    pub cwd: PathBuf,
    /// Shared undo history.
    pub history: Arc<Registry>,
    pub recorder: OperationRecorder,
    pub engine: Arc<RevertEngine>,
    pub query: HistoryQuery,
    /// Decides which paths tools may touch.
    pub access: Arc<dyn AccessControl>,
    /// File primitives used for every read and write.
    pub io: Arc<dyn FileIo>,
}

impl ToolContext {
    /// Build a context whose history components all share `history`.
    pub fn new(
        root_dir: impl Into<PathBuf>,
        history: Arc<Registry>,
        access: Arc<dyn AccessControl>,
        io: Arc<dyn FileIo>,
    ) -> Self {
        let root_dir = root_dir.into();
        Self {
            cwd: root_dir.clone(),
            root_dir,
            recorder: OperationRecorder::new(history.clone()),
            engine: Arc::new(RevertEngine::new(
                history.clone(),
                access.clone(),
                io.clone(),
            )),
            query: HistoryQuery::new(history.clone()),
            history,
            access,
            io,
        }
    }

    /// Set the working directory relative paths resolve against.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Resolve a tool's `filePath` argument to a checked [`FileKey`].
    ///
    /// Relative paths are taken against the working directory.
    pub fn resolve_key(&self, file_path: &str) -> ToolResult<FileKey> {
        if file_path.trim().is_empty() {
            return Err(ToolError::validation("filePath cannot be empty"));
        }

        let path = Path::new(file_path);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };

        let key = FileKey::resolve(&absolute)?;
        self.access.check_allowed(key.as_path())?;
        Ok(key)
    }
}

/// Result of tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Title/summary of the operation.
    pub title: String,
    /// Output text.
    pub output: String,
    /// Tool-specific metadata.
    pub metadata: Value,
}

impl ToolOutput {
    /// Create a new tool output.
    pub fn new(title: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            output: output.into(),
            metadata: Value::Null,
        }
    }

    /// Add metadata to the output.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The main trait for tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool ID.
    fn id(&self) -> &str;

    /// Get the tool description.
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput>;
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool = Arc<dyn Tool>;


#[cfg(test)]
mod tests {
    use super::*;
    use rewind_history::{HistoryConfig, HistoryError};

    #[test]
    fn test_resolve_key_relative_to_cwd() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let sub = ctx.root_dir.join("sub");
        let ctx = ctx.with_cwd(&sub);

        let key = ctx.resolve_key("a.txt").unwrap();
        assert_eq!(key.as_path(), sub.join("a.txt"));
    }

    #[test]
    fn test_resolve_key_rejects_empty() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        assert!(matches!(
            ctx.resolve_key("  "),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_key_rejects_outside_root() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let outside = ctx.root_dir.join("../elsewhere.txt");

        let err = ctx.resolve_key(outside.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ToolError::History(HistoryError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_tool_output_with_metadata() {
        let output = ToolOutput::new("Title", "Body").with_metadata(serde_json::json!({"a": 1}));
        assert_eq!(output.title, "Title");
        assert_eq!(output.metadata["a"], 1);
    }
}
