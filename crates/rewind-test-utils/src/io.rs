//! File I/O test double.

use async_trait::async_trait;
use rewind_history::{FileIo, LocalFileIo};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A local-disk [`FileIo`] whose writes and deletes can be made to fail.
///
/// Every call is logged so tests can check which primitives ran.
#[derive(Clone, Default)]
pub struct FlakyFileIo {
    fail_writes: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<IoCall>>>,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoCall {
    Read(PathBuf),
    Write(PathBuf),
    Delete(PathBuf),
}

impl FlakyFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `PermissionDenied`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail with `PermissionDenied`.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<IoCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn log(&self, call: IoCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn injected(operation: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("injected {operation} failure"),
        )
    }
}

#[async_trait]
impl FileIo for FlakyFileIo {
    async fn read_content(&self, path: &Path) -> io::Result<Option<String>> {
        self.log(IoCall::Read(path.to_path_buf()));
        LocalFileIo.read_content(path).await
    }

    async fn write_content(&self, path: &Path, content: &str) -> io::Result<()> {
        self.log(IoCall::Write(path.to_path_buf()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected("write"));
        }
        LocalFileIo.write_content(path, content).await
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        self.log(IoCall::Delete(path.to_path_buf()));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::injected("delete"));
        }
        LocalFileIo.delete_file(path).await
    }
}
