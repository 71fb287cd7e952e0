//! Edit tool - perform exact string replacements in files.
//!
//! This tool performs search and replace operations on files with:
//! - Exact string matching
//! - Atomic file writes
//! - Replace-all support
//! - A unified diff of the change as output

use crate::{PendingMutation, Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use rewind_history::{EditDetails, Operation};
use serde::Deserialize;
use serde_json::{json, Value};
use similar::{ChangeTag, TextDiff};
use std::path::Path;
use tracing::debug;

/// Edit tool for string replacement.
pub struct EditTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditArgs {
    file_path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[async_trait]
impl Tool for EditTool {
    fn id(&self) -> &str {
        "edit"
    }

    fn description(&self) -> &str {
        r#"Performs exact string replacements in files.

Usage:
- The edit will FAIL if `oldString` is not found in the file.
- The edit will FAIL if `oldString` is found multiple times (unless replaceAll is true).
- Use `replaceAll` for replacing all occurrences.
- Preserve exact indentation from the original file.
- The edit can be reverted with the undo tool."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "oldString", "newString"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "The absolute path to the file to modify"
                },
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
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let args: EditArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;

        let key = ctx.resolve_key(&args.file_path)?;
        let pending = PendingMutation::begin(ctx, key.clone()).await?;

        let content = pending
            .prior()
            .ok_or_else(|| ToolError::file_not_found(key.to_string()))?
            .to_string();

        let (new_content, replacements) =
            apply_edit(&content, &args.old_string, &args.new_string, args.replace_all)?;

        // Generate diff for display
        let diff = generate_diff(&content, &new_content, key.as_path());

        let details = EditDetails::new(&args.old_string, &args.new_string)
            .with_replacements(replacements);
        let id = pending
            .commit(Operation::edit(content, new_content, details))
            .await?;

        debug!(path = %key, replacements, "Edited file");

        let old_lines = args.old_string.lines().count();
        let new_lines = args.new_string.lines().count();
        let additions = new_lines.saturating_sub(old_lines);
        let deletions = old_lines.saturating_sub(new_lines);

        Ok(
            ToolOutput::new(format!("Edited {}", key), diff).with_metadata(json!({
                "file": key.to_string(),
                "additions": additions,
                "deletions": deletions,
                "replaced": replacements,
                "operationId": id
            })),
        )
    }
}

/// Result of finding matches.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MatchResult {
    None,
    Single,
    Multiple(usize),
}

/// Find matches of needle in haystack.
pub(crate) fn find_matches(haystack: &str, needle: &str) -> MatchResult {
    let count = haystack.matches(needle).count();
    match count {
        0 => MatchResult::None,
        1 => MatchResult::Single,
        n => MatchResult::Multiple(n),
    }
}

/// Replace `old` by `new` in `content`, returning the result and the
/// number of replacements made.
pub(crate) fn apply_edit(
    content: &str,
    old: &str,
    new: &str,
    replace_all: bool,
) -> ToolResult<(String, usize)> {
    if old.is_empty() {
        return Err(ToolError::validation("oldString cannot be empty"));
    }
    if old == new {
        return Err(ToolError::validation(
            "oldString and newString must be different",
        ));
    }

    match find_matches(content, old) {
        MatchResult::None => Err(ToolError::execution_failed(
            "oldString not found in file content",
        )),
        MatchResult::Single => Ok((content.replacen(old, new, 1), 1)),
        MatchResult::Multiple(count) if replace_all => Ok((content.replace(old, new), count)),
        MatchResult::Multiple(count) => Err(ToolError::execution_failed(format!(
            "oldString found {count} times. Use replaceAll to replace all occurrences, or provide more context to make the match unique."
        ))),
    }
}

/// Render a unified-style diff between two versions of a file.
pub(crate) fn generate_diff(old: &str, new: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    output.push_str(&format!("--- a/{}\n", path.display()));
    output.push_str(&format!("+++ b/{}\n", path.display()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                output.push_str(sign);
                output.push_str(change.value());
                if !change.value().ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rewind_history::{HistoryConfig, OperationKind};

    #[test]
    fn test_find_matches() {
        assert_eq!(find_matches("abc", "x"), MatchResult::None);
        assert_eq!(find_matches("abc", "b"), MatchResult::Single);
        assert_eq!(find_matches("abab", "ab"), MatchResult::Multiple(2));
    }

    #[test]
    fn test_apply_edit_rejects_ambiguous_match() {
        let err = apply_edit("foo foo", "foo", "bar", false).unwrap_err();
        assert!(err.to_string().contains("found 2 times"));

        let (content, count) = apply_edit("foo foo", "foo", "bar", true).unwrap();
        assert_eq!(content, "bar bar");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_apply_edit_rejects_identical_strings() {
        assert!(matches!(
            apply_edit("foo", "foo", "foo", false),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_generate_diff_marks_changes() {
        let diff = generate_diff("a\nb\n", "a\nc\n", Path::new("f.txt"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));
    }

    #[tokio::test]
    async fn test_edit_records_and_undoes() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let path = ctx.root_dir.join("test.txt");
        std::fs::write(&path, "Hello, World!").unwrap();

        let output = EditTool
            .execute(
                json!({
                    "filePath": path.to_str().unwrap(),
                    "oldString": "World",
                    "newString": "Rust"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(output.metadata["replaced"], 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello, Rust!");

        let key = ctx.resolve_key(path.to_str().unwrap()).unwrap();
        let summary = ctx.engine.undo(&key).await.unwrap();
        assert_eq!(summary.kind, OperationKind::Edit);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello, World!");
    }

    #[tokio::test]
    async fn test_edit_missing_file() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let path = ctx.root_dir.join("missing.txt");

        let result = EditTool
            .execute(
                json!({
                    "filePath": path.to_str().unwrap(),
                    "oldString": "a",
                    "newString": "b"
                }),
                &ctx,
            )
            .await;

        assert!(matches!(result, Err(ToolError::FileNotFound(_))));
        let key = ctx.resolve_key(path.to_str().unwrap()).unwrap();
        assert!(!ctx.history.has_history(&key).await);
    }

    #[tokio::test]
    async fn test_failed_edit_records_nothing() {
        let (_dir, ctx) = test_support::context(HistoryConfig::default());
        let path = ctx.root_dir.join("test.txt");
        std::fs::write(&path, "Hello").unwrap();

        let result = EditTool
            .execute(
                json!({
                    "filePath": path.to_str().unwrap(),
                    "oldString": "Goodbye",
                    "newString": "Hi"
                }),
                &ctx,
            )
            .await;

        assert!(result.is_err());
        let key = ctx.resolve_key(path.to_str().unwrap()).unwrap();
        assert!(!ctx.history.has_history(&key).await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello");
    }
}
