//! Appending completed mutations to history.

use crate::{FileKey, HistoryGuard, HistoryResult, Operation, OperationId, OperationRecord, Registry};
use std::sync::Arc;
use tracing::debug;

/// Records completed file mutations.
///
/// Recording is pure in-memory work: it never touches the filesystem and
/// never fails because of content size.
#[derive(Clone)]
pub struct OperationRecorder {
    registry: Arc<Registry>,
}

impl OperationRecorder {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Record a mutation of `key`, taking the file's lock for the push.
    ///
    /// The caller must have captured the prior content before the mutation
    /// began. Returns [`crate::HistoryError::Disabled`] without creating any
    /// state when history is switched off.
    pub async fn record(&self, key: &FileKey, operation: Operation) -> HistoryResult<OperationId> {
        self.registry.ensure_enabled()?;
        let mut guard = self.registry.lock(key).await?;
        Ok(self.record_locked(&mut guard, operation))
    }

    /// Record a mutation while already holding the file's lock.
    pub fn record_locked(&self, guard: &mut HistoryGuard, operation: Operation) -> OperationId {
        let record = OperationRecord::new(self.registry.next_id(), operation);
        let id = record.id;
        let kind = record.kind();
        let size_bytes = record.size_bytes();

        let evicted = guard.stack_mut().push(record);
        for old in &evicted {
            debug!(path = %guard.key(), id = %old.id, "Evicted oldest undo record");
        }

        debug!(
            path = %guard.key(),
            id = %id,
            kind = %kind,
            bytes = size_bytes,
            depth = guard.len(),
            "Recorded operation"
        );

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditDetails, HistoryConfig, HistoryError, OperationKind};

    fn key() -> FileKey {
        FileKey::resolve("/rewind-recorder-test/file.txt").unwrap()
    }

    fn recorder(config: HistoryConfig) -> OperationRecorder {
        OperationRecorder::new(Registry::shared(config).unwrap())
    }

    #[tokio::test]
    async fn test_record_appends() {
        let recorder = recorder(HistoryConfig::default());
        let first = recorder
            .record(&key(), Operation::create("Hello, World!"))
            .await
            .unwrap();
        let second = recorder
            .record(
                &key(),
                Operation::edit(
                    "Hello, World!",
                    "Hello, Universe!",
                    EditDetails::new("World", "Universe"),
                ),
            )
            .await
            .unwrap();

        assert!(second > first);
        let guard = recorder.registry().lock(&key()).await.unwrap();
        assert_eq!(guard.len(), 2);
        assert_eq!(guard.peek().unwrap().kind(), OperationKind::Edit);
        assert_eq!(guard.peek().unwrap().id, second);
    }

    #[tokio::test]
    async fn test_bounded_history_keeps_last_operations() {
        let recorder = recorder(HistoryConfig::default().with_max_operations(3));
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(
                recorder
                    .record(&key(), Operation::overwrite(format!("v{i}"), format!("v{}", i + 1)))
                    .await
                    .unwrap(),
            );
        }

        let guard = recorder.registry().lock(&key()).await.unwrap();
        let kept: Vec<OperationId> = guard.stack().iter().map(|r| r.id).collect();
        assert_eq!(kept, ids[4..].to_vec());
    }

    #[tokio::test]
    async fn test_record_disabled_creates_nothing() {
        let recorder = recorder(HistoryConfig::disabled());
        let result = recorder.record(&key(), Operation::create("x")).await;

        assert!(matches!(result, Err(HistoryError::Disabled)));
        assert_eq!(recorder.registry().stats().await.total_operations, 0);
        assert!(recorder.registry().files_with_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_large_content_is_accepted() {
        let recorder = recorder(HistoryConfig::default());
        let big = "x".repeat(4 * 1024 * 1024);
        recorder
            .record(&key(), Operation::create(big.clone()))
            .await
            .unwrap();
        let guard = recorder.registry().lock(&key()).await.unwrap();
        assert_eq!(guard.peek().unwrap().size_bytes(), big.len());
    }
}
