//! Process-wide registry of per-file history stacks.

use crate::{
    FileKey, HistoryConfig, HistoryError, HistoryResult, HistoryStack, OperationId,
    OperationRecord,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

type SharedStack = Arc<Mutex<HistoryStack>>;

/// Owns every [`HistoryStack`] and the history configuration.
///
/// Each file's stack sits behind its own mutex. The map from [`FileKey`] to
/// stack has a separate lock that is only held long enough to look up or
/// insert an entry, never while waiting on a stack or doing I/O, so work on
/// different files never serializes.
///
/// Entries are created on the first lock of a key and are never removed:
/// every holder of a key always contends on the same mutex. An empty stack
/// means "no history".
pub struct Registry {
    config: HistoryConfig,
    stacks: RwLock<HashMap<FileKey, SharedStack>>,
    next_id: AtomicU64,
}

impl Registry {
    /// Create a registry, validating the configuration.
    pub fn new(config: HistoryConfig) -> HistoryResult<Self> {
        config.validate()?;
        if !config.enabled {
            debug!("Undo history is disabled");
        }

        Ok(Self {
            config,
            stacks: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a shared registry.
    pub fn shared(config: HistoryConfig) -> HistoryResult<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn max_operations_per_file(&self) -> usize {
        self.config.max_operations_per_file
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Fail with [`HistoryError::Disabled`] when history is switched off.
    pub fn ensure_enabled(&self) -> HistoryResult<()> {
        if self.config.enabled {
            Ok(())
        } else {
            Err(HistoryError::Disabled)
        }
    }

    /// Take the exclusive lock for a file, creating its entry if needed.
    ///
    /// Host tools hold this guard across "read prior content, mutate the
    /// file, record the operation" so that mutations, recordings and undos
    /// of one file share a single lock domain.
    pub async fn lock(&self, key: &FileKey) -> HistoryResult<HistoryGuard> {
        self.ensure_enabled()?;

        let stack = match self.existing(key).await {
            Some(stack) => stack,
            None => {
                let mut stacks = self.stacks.write().await;
                stacks
                    .entry(key.clone())
                    .or_insert_with(|| {
                        Arc::new(Mutex::new(HistoryStack::new(
                            self.config.max_operations_per_file,
                        )))
                    })
                    .clone()
            }
        };

        Ok(HistoryGuard {
            key: key.clone(),
            stack: stack.lock_owned().await,
        })
    }

    /// Take the lock for a file only if it already has an entry.
    pub(crate) async fn lock_existing(&self, key: &FileKey) -> Option<HistoryGuard> {
        let stack = self.existing(key).await?;
        Some(HistoryGuard {
            key: key.clone(),
            stack: stack.lock_owned().await,
        })
    }

    async fn existing(&self, key: &FileKey) -> Option<SharedStack> {
        self.stacks.read().await.get(key).cloned()
    }

    async fn all_stacks(&self) -> Vec<(FileKey, SharedStack)> {
        self.stacks
            .read()
            .await
            .iter()
            .map(|(key, stack)| (key.clone(), stack.clone()))
            .collect()
    }

    pub(crate) fn next_id(&self) -> OperationId {
        OperationId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Check whether a file has at least one recorded operation.
    pub async fn has_history(&self, key: &FileKey) -> bool {
        if !self.config.enabled {
            return false;
        }
        match self.existing(key).await {
            Some(stack) => !stack.lock().await.is_empty(),
            None => false,
        }
    }

    /// Files with at least one recorded operation, sorted by path.
    pub async fn files_with_history(&self) -> Vec<FileKey> {
        let mut files = Vec::new();
        for (key, stack) in self.all_stacks().await {
            if !stack.lock().await.is_empty() {
                files.push(key);
            }
        }
        files.sort();
        files
    }

    /// Counts and estimated memory use across all files.
    pub async fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        for (key, stack) in self.all_stacks().await {
            let stack = stack.lock().await;
            if stack.is_empty() {
                continue;
            }
            let path_len = key.as_path().as_os_str().len();
            stats.files_with_history += 1;
            stats.total_operations += stack.len();
            stats.estimated_bytes += stack
                .iter()
                .map(|record| record.estimated_bytes(path_len))
                .sum::<usize>();
        }
        stats
    }

    /// Drop one file's history.
    pub async fn clear(&self, key: &FileKey) {
        if let Some(mut guard) = self.lock_existing(key).await {
            guard.stack.clear();
            debug!(path = %key, "Cleared undo history");
        }
    }

    /// Drop every file's history.
    pub async fn clear_all(&self) {
        for (_, stack) in self.all_stacks().await {
            stack.lock().await.clear();
        }
        debug!("Cleared all undo history");
    }
}

/// Aggregate history diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub files_with_history: usize,
    pub total_operations: usize,
    pub estimated_bytes: usize,
}

/// Exclusive access to one file's history stack.
///
/// Obtained from [`Registry::lock`]; the lock is released on drop.
pub struct HistoryGuard {
    key: FileKey,
    stack: OwnedMutexGuard<HistoryStack>,
}

impl HistoryGuard {
    pub fn key(&self) -> &FileKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The newest record.
    pub fn peek(&self) -> Option<&OperationRecord> {
        self.stack.peek()
    }

    pub(crate) fn stack(&self) -> &HistoryStack {
        &self.stack
    }

    pub(crate) fn stack_mut(&mut self) -> &mut HistoryStack {
        &mut self.stack
    }
}
