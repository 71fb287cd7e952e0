//! Recorded file mutations.

use crate::{ToolContext, ToolError, ToolResult};
use rewind_history::{FileKey, HistoryGuard, Operation, OperationId};
use tracing::warn;

/// A mutation in progress on one file.
///
/// Holds the file's history lock (when history is on) from reading the prior
/// content until the new content is written and recorded, so no undo or
/// other mutation of the same file can interleave.
pub struct PendingMutation<'a> {
    ctx: &'a ToolContext,
    key: FileKey,
    guard: Option<HistoryGuard>,
    prior: Option<String>,
}

impl<'a> PendingMutation<'a> {
    /// Lock `key` and capture its current content.
    pub async fn begin(ctx: &'a ToolContext, key: FileKey) -> ToolResult<Self> {
        let guard = if ctx.history.is_enabled() {
            Some(ctx.history.lock(&key).await?)
        } else {
            None
        };

        let prior = ctx.io.read_content(key.as_path()).await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to read {}: {}", key, e))
        })?;

        Ok(Self {
            ctx,
            key,
            guard,
            prior,
        })
    }

    pub fn key(&self) -> &FileKey {
        &self.key
    }

    /// Content before the mutation, `None` if the file does not exist.
    pub fn prior(&self) -> Option<&str> {
        self.prior.as_deref()
    }

    /// Write the operation's new content and record it.
    ///
    /// Returns the record's ID, or `None` when history is switched off.
    /// Nothing is recorded if the write fails.
    pub async fn commit(mut self, operation: Operation) -> ToolResult<Option<OperationId>> {
        self.ctx
            .io
            .write_content(self.key.as_path(), operation.new_content())
            .await
            .map_err(|e| {
                warn!(path = %self.key, error = %e, "Failed to write file");
                ToolError::execution_failed(format!("Failed to write {}: {}", self.key, e))
            })?;

        Ok(self
            .guard
            .as_mut()
            .map(|guard| self.ctx.recorder.record_locked(guard, operation)))
    }
}
