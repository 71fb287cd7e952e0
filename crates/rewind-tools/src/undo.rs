//! Undo tool - revert or list a file's recorded operations.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use rewind_history::{FileKey, OperationKind, OperationSummary, RevertSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write as _;
use tracing::info;

/// Reverts the most recent write or edit of a file.
pub struct UndoTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UndoArgs {
    file_path: String,
    #[serde(default)]
    list_history: bool,
    #[serde(default)]
    show_content: bool,
}

#[async_trait]
impl Tool for UndoTool {
    fn id(&self) -> &str {
        "undo"
    }

    fn description(&self) -> &str {
        r#"Undo the most recent write or edit operation on a file.

Reverts the file to its state before the last modification.
Only works on files that have been modified while this server is running.
Can also list the undo history for a file to see available operations."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Absolute path to the file to undo changes for"
                },
                "listHistory": {
                    "type": "boolean",
                    "description": "If true, list available undo operations instead of performing undo",
                    "default": false
                },
                "showContent": {
                    "type": "boolean",
                    "description": "If true and listHistory is true, show content preview for each operation",
                    "default": false
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: UndoArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let key = ctx.resolve_key(&args.file_path)?;
        ctx.history.ensure_enabled()?;

        if args.list_history {
            list_history(ctx, &key, args.show_content).await
        } else {
            perform_undo(ctx, &key).await
        }
    }
}

async fn list_history(
    ctx: &ToolContext,
    key: &FileKey,
    show_content: bool,
) -> ToolResult<ToolOutput> {
    let history = ctx.query.list(key, show_content).await?;
    let title = format!("Undo history for {}", key);

    if history.is_empty() {
        return Ok(ToolOutput::new(
            title,
            format!("No undo history available for: {}", key),
        )
        .with_metadata(json!({ "file": key.to_string(), "operations": [] })));
    }

    let output = render_history(key, &history);
    Ok(ToolOutput::new(title, output).with_metadata(json!({
        "file": key.to_string(),
        "operations": history
    })))
}

async fn perform_undo(ctx: &ToolContext, key: &FileKey) -> ToolResult<ToolOutput> {
    let summary = ctx.engine.undo(key).await?;
    info!(path = %key, id = %summary.id, "Undo performed");

    let output = render_revert(key, &summary);
    Ok(
        ToolOutput::new(format!("Undo {}", key), output).with_metadata(json!({
            "file": key.to_string(),
            "reverted": summary
        })),
    )
}

/// Render a listing, newest operation first.
fn render_history(key: &FileKey, history: &[OperationSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Undo history for: {}", key);
    out.push('\n');

    for (idx, op) in history.iter().enumerate() {
        let _ = writeln!(out, "Operation {}: {}", idx + 1, op.action());
        let _ = writeln!(out, "  Time: {}", op.local_time());
        let _ = writeln!(out, "  Content size: {} bytes", op.size_bytes);
        match op.prior_size_bytes {
            Some(prior) => {
                let _ = writeln!(out, "  Previous size: {} bytes", prior);
            }
            None => out.push_str("  Previous: (file did not exist)\n"),
        }

        if let Some(preview) = &op.preview {
            out.push_str("  Content preview:\n");
            for line in &preview.lines {
                let _ = writeln!(out, "    {}", line);
            }
            if preview.truncated {
                out.push_str("    ...\n");
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Total operations: {}", history.len());
    out.push_str("Use 'undo' without listHistory=true to revert the most recent operation.");
    out
}

fn render_revert(key: &FileKey, summary: &RevertSummary) -> String {
    let mut out = match (summary.kind, summary.resulting_len) {
        (OperationKind::Create, _) | (_, None) => {
            format!("Successfully undone file creation: {} (file deleted)", key)
        }
        (kind, Some(len)) => {
            let how = if summary.substituted {
                "edit reversed in place"
            } else {
                "restored to previous state"
            };
            format!(
                "Successfully undone {} operation on {}\nFile {} ({} bytes)",
                kind, key, how, len
            )
        }
    };

    let _ = write!(out, "\nRemaining undo operations: {}", summary.remaining);
    out
}
