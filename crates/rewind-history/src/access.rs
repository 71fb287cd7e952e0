//! Access control seam.

use crate::{HistoryError, HistoryResult};
use rewind_util::path::canonicalize_lenient;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Decides whether a path may be read or written.
///
/// Host tools call this before mutating a file, and the revert engine calls
/// it again before applying an inverse write or delete.
pub trait AccessControl: Send + Sync {
    fn check_allowed(&self, path: &Path) -> HistoryResult<()>;
}

/// Allows paths that lie under one of a fixed set of root directories.
#[derive(Debug, Clone)]
pub struct AllowedRoots {
    roots: Vec<PathBuf>,
}

impl AllowedRoots {
    /// Create from a list of root directories.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            roots: roots
                .into_iter()
                .map(|root| canonicalize_lenient(root.as_ref()))
                .collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_allowed(&self, path: &Path) -> bool {
        if !path.is_absolute() {
            return false;
        }
        let resolved = canonicalize_lenient(path);
        self.roots.iter().any(|root| resolved.starts_with(root))
    }
}

impl AccessControl for AllowedRoots {
    fn check_allowed(&self, path: &Path) -> HistoryResult<()> {
        if self.is_allowed(path) {
            return Ok(());
        }

        warn!(path = %path.display(), "Access outside allowed directories");
        Err(HistoryError::access_denied(format!(
            "path outside allowed directories: {}",
            path.display()
        )))
    }
}
