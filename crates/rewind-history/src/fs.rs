//! File I/O seam.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Single-file content primitives.
///
/// Each call is treated as atomic by the history engine.
#[async_trait]
pub trait FileIo: Send + Sync {
    /// Read a file as text, `None` if it does not exist.
    async fn read_content(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replace a file's content, creating it (and its parents) if needed.
    async fn write_content(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Delete a file.
    async fn delete_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileIo`] on the local filesystem.
///
/// Writes go to a temporary file in the target directory which is then
/// renamed over the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileIo;

impl LocalFileIo {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileIo for LocalFileIo {
    async fn read_content(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write_content(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(path);
        fs::write(&temp_path, content).await?;

        let rename_result = fs::rename(&temp_path, path).await;
        if rename_result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        rename_result
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

/// Hidden sibling of `path` with a per-process, per-instant suffix.
fn temp_path_for(path: &Path) -> PathBuf {
    let suffix: u64 = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ u64::from(std::process::id());
    let temp_name = format!(
        ".{}.{:x}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        suffix
    );
    path.parent()
        .map(|p| p.join(&temp_name))
        .unwrap_or_else(|| PathBuf::from(&temp_name))
}
