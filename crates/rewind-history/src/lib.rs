//! Undo history engine for rewind.
//!
//! This crate records every mutating file operation performed by the host
//! tools, keeps a bounded per-file history of them, and reverses the most
//! recent one on request:
//! - [`OperationRecorder`] appends completed mutations
//! - [`RevertEngine`] applies the inverse of the newest record and pops it
//! - [`HistoryQuery`] lists a file's history without changing it
//! - [`Registry`] owns every per-file stack and the configuration
//!
//! History lives in memory for the lifetime of the process only.
//!
//! # Example
//!
//! ```no_run
//! use rewind_history::{
//!     AllowedRoots, FileKey, HistoryConfig, LocalFileIo, Operation, OperationRecorder,
//!     Registry, RevertEngine,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(Registry::new(HistoryConfig::default())?);
//! let recorder = OperationRecorder::new(registry.clone());
//! let engine = RevertEngine::new(
//!     registry.clone(),
//!     Arc::new(AllowedRoots::new(["/project/root"])),
//!     Arc::new(LocalFileIo::new()),
//! );
//!
//! let key = FileKey::resolve("/project/root/notes.txt")?;
//!
//! // ... create the file with "Hello, World!" ...
//! recorder
//!     .record(&key, Operation::create("Hello, World!"))
//!     .await?;
//!
//! // Deletes the file again
//! engine.undo(&key).await?;
//! # Ok(())
//! # }
//! ```

mod access;
mod config;
mod error;
mod fs;
mod key;
mod query;
mod record;
mod recorder;
mod registry;
mod revert;
mod stack;

pub use access::{AccessControl, AllowedRoots};
pub use config::{HistoryConfig, ENV_UNDO_ENABLED, ENV_UNDO_MAX_OPERATIONS};
pub use error::{HistoryError, HistoryResult};
pub use fs::{FileIo, LocalFileIo};
pub use key::FileKey;
pub use query::{ContentPreview, HistoryQuery, OperationSummary};
pub use record::{EditDetails, Operation, OperationId, OperationKind, OperationRecord};
pub use recorder::OperationRecorder;
pub use registry::{HistoryGuard, HistoryStats, Registry};
pub use revert::{InverseAction, RevertEngine, RevertSummary};
pub use stack::HistoryStack;
