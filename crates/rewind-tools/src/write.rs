//! Write tool - write file contents.

use crate::{PendingMutation, Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use rewind_history::Operation;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Write file contents.
pub struct WriteTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteArgs {
    file_path: String,
    content: String,
}

#[async_trait]
impl Tool for WriteTool {
    fn id(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        r#"Writes a file to the local filesystem.

Usage:
- This tool will overwrite the existing file if there is one at the provided path.
- Missing parent directories are created.
- The write can be reverted with the undo tool."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "content"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: WriteArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let key = ctx.resolve_key(&args.file_path)?;
        let pending = PendingMutation::begin(ctx, key.clone()).await?;

        let created = pending.prior().is_none();
        let operation = Operation::write(pending.prior().map(str::to_string), args.content);
        let bytes = operation.new_content().len();

        // Generate preview (first 10 lines)
        let preview: String = operation
            .new_content()
            .lines()
            .take(10)
            .collect::<Vec<_>>()
            .join("\n");

        let id = pending.commit(operation).await?;
        debug!(path = %key, bytes, created, "Wrote file");

        let title = if created {
            format!("Created {}", key)
        } else {
            format!("Wrote {}", key)
        };

        Ok(
            ToolOutput::new(title, format!("Successfully wrote {} bytes", bytes)).with_metadata(
                json!({
                    "bytes": bytes,
                    "path": key.to_string(),
                    "created": created,
                    "operationId": id,
                    "preview": preview
                }),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rewind_history::{HistoryConfig, OperationKind};

    #[tokio::test]
    async fn test_write_creates_and_records() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let path = ctx.root_dir.join("nested/new.txt");

        let output = WriteTool
            .execute(
                json!({"filePath": path.to_str().unwrap(), "content": "Hello, World!"}),
                &ctx,
            )
            .await
            .unwrap();

        assert!(output.title.starts_with("Created"));
        assert_eq!(output.metadata["created"], true);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello, World!");

        let key = ctx.resolve_key(path.to_str().unwrap()).unwrap();
        let history = ctx.query.list(&key, false).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, OperationKind::Create);
    }

    #[tokio::test]
    async fn test_write_overwrites_and_undo_restores() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let path = ctx.root_dir.join("file.txt");
        std::fs::write(&path, "before").unwrap();

        WriteTool
            .execute(
                json!({"filePath": path.to_str().unwrap(), "content": "after"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after");

        let key = ctx.resolve_key(path.to_str().unwrap()).unwrap();
        let summary = ctx.engine.undo(&key).await.unwrap();
        assert_eq!(summary.kind, OperationKind::Overwrite);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "before");
    }

    #[tokio::test]
    async fn test_write_outside_root_is_denied() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let outside = ctx.root_dir.join("../outside.txt");

        let result = WriteTool
            .execute(
                json!({"filePath": outside.to_str().unwrap(), "content": "x"}),
                &ctx,
            )
            .await;

        assert!(matches!(result, Err(ToolError::History(_))));
    }

    #[tokio::test]
    async fn test_write_missing_content() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let result = WriteTool
            .execute(json!({"filePath": "/tmp/x.txt"}), &ctx)
            .await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[tokio::test]
    async fn test_write_with_history_disabled() {
        let (_dir, ctx) = test_support::context(HistoryConfig::disabled());
        let path = ctx.root_dir.join("file.txt");

        let output = WriteTool
            .execute(
                json!({"filePath": path.to_str().unwrap(), "content": "x"}),
                &ctx,
            )
            .await
            .unwrap();

        assert!(output.metadata["operationId"].is_null());
        assert!(path.exists());
    }
}
