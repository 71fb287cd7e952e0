//! Read-only history listing.

use crate::{FileKey, HistoryResult, OperationId, OperationKind, OperationRecord, Registry};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Lines of content shown in a preview.
const PREVIEW_LINES: usize = 3;

/// Characters per preview line before truncation.
const PREVIEW_LINE_WIDTH: usize = 80;

/// Bounded excerpt of a record's resulting content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPreview {
    /// Leading lines, each cut to a fixed width with a trailing `...`.
    pub lines: Vec<String>,
    /// Whether the content has more lines than shown.
    pub truncated: bool,
}

impl ContentPreview {
    pub fn of(content: &str) -> Self {
        let lines = content
            .split('\n')
            .take(PREVIEW_LINES)
            .map(|line| {
                if line.chars().count() > PREVIEW_LINE_WIDTH {
                    let cut: String = line.chars().take(PREVIEW_LINE_WIDTH).collect();
                    format!("{cut}...")
                } else {
                    line.to_string()
                }
            })
            .collect();

        Self {
            lines,
            truncated: content.split('\n').count() > PREVIEW_LINES,
        }
    }
}

/// Read-only view of one recorded operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub id: OperationId,
    pub kind: OperationKind,
    pub timestamp: DateTime<Utc>,
    /// Byte length of the resulting content.
    pub size_bytes: usize,
    /// Byte length of the prior content, `None` for a create.
    pub prior_size_bytes: Option<usize>,
    /// Replacement count, for edits.
    pub replacements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ContentPreview>,
}

impl OperationSummary {
    pub fn from_record(record: &OperationRecord, include_preview: bool) -> Self {
        Self {
            id: record.id,
            kind: record.kind(),
            timestamp: record.timestamp,
            size_bytes: record.size_bytes(),
            prior_size_bytes: record.prior_content().map(str::len),
            replacements: record.edit_details().map(|d| d.replacements),
            preview: include_preview.then(|| ContentPreview::of(record.new_content())),
        }
    }

    /// Human-readable action, e.g. `Edited file (2 replacements)`.
    pub fn action(&self) -> String {
        match self.kind {
            OperationKind::Create => "Created file".to_string(),
            OperationKind::Overwrite => "Overwrote file".to_string(),
            OperationKind::Edit => {
                let n = self.replacements.unwrap_or(1);
                format!(
                    "Edited file ({n} replacement{})",
                    if n == 1 { "" } else { "s" }
                )
            }
        }
    }

    /// Local wall-clock time of the operation.
    pub fn local_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

impl std::fmt::Display for OperationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} - {} bytes",
            self.local_time(),
            self.action(),
            self.size_bytes
        )
    }
}

/// Lists a file's history without changing it.
#[derive(Clone)]
pub struct HistoryQuery {
    registry: Arc<Registry>,
}

impl HistoryQuery {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// All operations of `key`, newest first. Empty when there is no history.
    pub async fn list(
        &self,
        key: &FileKey,
        include_preview: bool,
    ) -> HistoryResult<Vec<OperationSummary>> {
        self.list_recent(key, None, include_preview).await
    }

    /// At most `limit` operations of `key`, newest first.
    pub async fn list_recent(
        &self,
        key: &FileKey,
        limit: Option<usize>,
        include_preview: bool,
    ) -> HistoryResult<Vec<OperationSummary>> {
        self.registry.ensure_enabled()?;

        let Some(guard) = self.registry.lock_existing(key).await else {
            return Ok(Vec::new());
        };

        Ok(guard
            .stack()
            .iter_newest_first()
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| OperationSummary::from_record(record, include_preview))
            .collect())
    }
}
