//! Testing utilities, fixtures, and test doubles for rewind.
//!
//! - **Fixtures**: temporary project directories with seeded files
//! - **Assertions**: file and string assertions with readable failures
//! - **I/O**: a [`rewind_history::FileIo`] that fails on demand
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use rewind_test_utils::{fixtures::TestProject, io::FlakyFileIo};
//!
//! #[tokio::test]
//! async fn test_undo_survives_disk_errors() {
//!     let project = TestProject::new()
//!         .with_file("notes.txt", "Hello, World!")
//!         .build();
//!     let io = FlakyFileIo::new();
//!     io.fail_writes(true);
//!     // ... build a RevertEngine with `io` ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod io;

pub use fixtures::TestProject;
pub use io::FlakyFileIo;
