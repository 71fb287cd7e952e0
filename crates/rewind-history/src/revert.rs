//! Reverting the most recent operation of a file.

use crate::{
    AccessControl, FileIo, FileKey, HistoryError, HistoryGuard, HistoryResult, OperationId,
    OperationKind, OperationRecord, Registry,
};
use serde::Serialize;
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The filesystem action that undoes one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseAction {
    /// Remove the file a create produced.
    Delete,
    /// Write the record's prior content back verbatim.
    Restore { content: String },
    /// Write the current content with the edit's replacement swapped back.
    Substitute { content: String },
}

impl InverseAction {
    /// Compute the inverse of `record`.
    ///
    /// `current` is the file's present content, if known. It only matters
    /// for single-replacement edits of a file that has changed since the
    /// edit: when the replacement text still occurs exactly once it is
    /// swapped back, keeping unrelated changes. Every other case restores the
    /// prior content, which is always authoritative.
    pub fn for_record(record: &OperationRecord, current: Option<&str>) -> Self {
        let prior = match record.prior_content() {
            None => return Self::Delete,
            Some(prior) => prior,
        };

        if let (Some(details), Some(current)) = (record.edit_details(), current) {
            let diverged = current != record.new_content();
            if diverged
                && details.replacements == 1
                && !details.new_string.is_empty()
                && occurs_once(current, &details.new_string)
            {
                return Self::Substitute {
                    content: current.replacen(&details.new_string, &details.old_string, 1),
                };
            }
        }

        Self::Restore {
            content: prior.to_string(),
        }
    }

    /// Resulting file length, `None` when the file is deleted.
    pub fn resulting_len(&self) -> Option<usize> {
        match self {
            Self::Delete => None,
            Self::Restore { content } | Self::Substitute { content } => Some(content.len()),
        }
    }
}

/// Whether `needle` starts at exactly one position in `haystack`,
/// counting overlapping occurrences.
fn occurs_once(haystack: &str, needle: &str) -> bool {
    match haystack.find(needle) {
        Some(first) => haystack.rfind(needle) == Some(first),
        None => false,
    }
}

/// Outcome of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertSummary {
    /// The record that was reverted and removed.
    pub id: OperationId,
    pub kind: OperationKind,
    /// Length of the file afterwards, `None` if it was deleted.
    pub resulting_len: Option<usize>,
    /// Whether the edit was reverted by substitution rather than restoration.
    pub substituted: bool,
    /// Records left for the file.
    pub remaining: usize,
}

impl RevertSummary {
    pub fn file_deleted(&self) -> bool {
        self.resulting_len.is_none()
    }
}

/// Applies the inverse of a file's newest record and pops it.
pub struct RevertEngine {
    registry: Arc<Registry>,
    access: Arc<dyn AccessControl>,
    io: Arc<dyn FileIo>,
}

impl RevertEngine {
    pub fn new(
        registry: Arc<Registry>,
        access: Arc<dyn AccessControl>,
        io: Arc<dyn FileIo>,
    ) -> Self {
        Self {
            registry,
            access,
            io,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Undo the most recent operation of `key`.
    ///
    /// The file's lock is held from peeking the record until it is popped,
    /// so no recording or second undo of the same file can interleave. On
    /// any failure history is left unchanged.
    pub async fn undo(&self, key: &FileKey) -> HistoryResult<RevertSummary> {
        self.registry.ensure_enabled()?;

        let mut guard = self
            .registry
            .lock_existing(key)
            .await
            .ok_or_else(|| HistoryError::no_history(key))?;

        self.undo_locked(&mut guard).await
    }

    /// Undo while already holding the file's lock.
    pub async fn undo_locked(&self, guard: &mut HistoryGuard) -> HistoryResult<RevertSummary> {
        let key = guard.key().clone();
        let kind = guard
            .peek()
            .map(OperationRecord::kind)
            .ok_or_else(|| HistoryError::no_history(&key))?;

        self.access.check_allowed(key.as_path())?;

        let current = if kind == OperationKind::Edit {
            self.read_current(&key).await
        } else {
            None
        };

        let action = match guard.peek() {
            Some(record) => InverseAction::for_record(record, current.as_deref()),
            None => return Err(HistoryError::no_history(&key)),
        };

        self.apply(&key, &action).await?;

        let record = guard
            .stack_mut()
            .pop()
            .ok_or_else(|| HistoryError::no_history(&key))?;

        let summary = RevertSummary {
            id: record.id,
            kind: record.kind(),
            resulting_len: action.resulting_len(),
            substituted: matches!(action, InverseAction::Substitute { .. }),
            remaining: guard.len(),
        };

        info!(
            path = %key,
            id = %summary.id,
            kind = %summary.kind,
            remaining = summary.remaining,
            "Reverted operation"
        );

        Ok(summary)
    }

    async fn read_current(&self, key: &FileKey) -> Option<String> {
        match self.io.read_content(key.as_path()).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %key, error = %e, "Could not read current content, restoring prior content");
                None
            }
        }
    }

    async fn apply(&self, key: &FileKey, action: &InverseAction) -> HistoryResult<()> {
        let path = key.as_path();
        let result = match action {
            InverseAction::Delete => match self.io.delete_file(path).await {
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %key, "File already gone, nothing to delete");
                    Ok(())
                }
                other => other,
            },
            InverseAction::Restore { content } | InverseAction::Substitute { content } => {
                self.io.write_content(path, content).await
            }
        };

        result.map_err(|e| {
            warn!(path = %key, error = %e, "Failed to apply inverse action");
            HistoryError::io_failure(path, e)
        })
    }
}
