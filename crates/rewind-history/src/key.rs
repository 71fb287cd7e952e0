//! File identity used to index history.

use crate::{HistoryError, HistoryResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical absolute path identifying a tracked file.
///
/// Two operations share a history if and only if their keys are equal.
/// Keys are built with [`rewind_util::path::canonicalize_lenient`]: `.` and
/// `..` are removed and the longest existing ancestor is resolved through
/// symlinks, so the key of a file does not change when it is created or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileKey(PathBuf);

impl FileKey {
    /// Resolve an absolute path into its key.
    pub fn resolve(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(HistoryError::invalid_path("path cannot be empty"));
        }

        if !path.is_absolute() {
            return Err(HistoryError::invalid_path(format!(
                "path must be absolute: {}",
                path.display()
            )));
        }

        Ok(Self(rewind_util::path::canonicalize_lenient(path)))
    }

    /// Get the key as a path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consume the key, returning the path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for FileKey {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
