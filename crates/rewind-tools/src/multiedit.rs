//! MultiEdit tool - apply several edits to one file atomically.
//!
//! All edits are applied in memory, in order, each against the result of the
//! previous one. The file is written once, and only if every edit succeeds.
//! The batch is recorded as a single edit operation.

use crate::edit::{apply_edit, generate_diff};
use crate::{PendingMutation, Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use rewind_history::{EditDetails, Operation};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// MultiEdit tool for batch string replacements in one file.
pub struct MultiEditTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiEditArgs {
    /// Path to the file to edit.
    file_path: String,
    /// Edits to apply, in order.
    edits: Vec<EditOperation>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct EditOperation {
    /// The text to replace.
    old_string: String,
    /// The replacement text.
    new_string: String,
    /// Replace all occurrences (default false).
    #[serde(default)]
    replace_all: bool,
}

#[async_trait]
impl Tool for MultiEditTool {
    fn id(&self) -> &str {
        "multiedit"
    }

    fn description(&self) -> &str {
        r#"Applies multiple edits to a single file atomically.

Usage:
- Provide the filePath and an array of edits, each with oldString and newString.
- Edits are applied in order; each sees the result of the previous one.
- If any edit fails, the file is not modified.
- The whole batch is reverted by a single undo."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "edits"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to modify"
                },
                "edits": {
                    "type": "array",
                    "description": "List of edit operations to apply in order",
                    "items": {
                        "type": "object",
                        "required": ["oldString", "newString"],
                        "properties": {
                            "oldString": {
                                "type": "string",
                                "description": "The text to replace"
                            },
                            "newString": {
                                "type": "string",
                                "description": "The text to replace it with"
                            },
                            "replaceAll": {
                                "type": "boolean",
                                "description": "Replace all occurrences (default false)"
                            }
                        }
                    }
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: MultiEditArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let Some(last) = args.edits.last() else {
            return Err(ToolError::validation("No edits provided"));
        };

        let key = ctx.resolve_key(&args.file_path)?;
        let pending = PendingMutation::begin(ctx, key.clone()).await?;

        let original = pending
            .prior()
            .ok_or_else(|| ToolError::file_not_found(key.to_string()))?
            .to_string();

        let mut content = original.clone();
        let mut total_replacements = 0;
        for (idx, op) in args.edits.iter().enumerate() {
            let (modified, replacements) =
                apply_edit(&content, &op.old_string, &op.new_string, op.replace_all).map_err(
                    |e| match e {
                        ToolError::Validation(msg) => {
                            ToolError::validation(format!("Edit {}: {}", idx + 1, msg))
                        }
                        ToolError::ExecutionFailed(msg) => {
                            ToolError::execution_failed(format!("Edit {}: {}", idx + 1, msg))
                        }
                        other => other,
                    },
                )?;
            content = modified;
            total_replacements += replacements;
        }

        let diff = generate_diff(&original, &content, key.as_path());

        let details = EditDetails::new(&last.old_string, &last.new_string)
            .with_replacements(total_replacements);
        let id = pending
            .commit(Operation::edit(original, content, details))
            .await?;

        debug!(
            path = %key,
            edits = args.edits.len(),
            replacements = total_replacements,
            "Applied multiedit"
        );

        Ok(ToolOutput::new(
            format!("Applied {} edits to {}", args.edits.len(), key),
            diff,
        )
        .with_metadata(json!({
            "file": key.to_string(),
            "edits": args.edits.len(),
            "replaced": total_replacements,
            "operationId": id
        })))
    }
}
