//! Path utilities.
//!
//! This module provides utilities for working with file paths.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Get the rewind configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/rewind` if set
/// - `~/.config/rewind` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rewind"))
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Canonicalize a path that may not exist yet.
///
/// The path is normalized first, then its longest existing ancestor is
/// resolved through the filesystem (following symlinks) and the missing
/// remainder is appended unchanged. A file therefore maps to the same
/// result before it is created, while it exists, and after it is deleted.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    let mut existing = normalized.clone();
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            for name in missing.iter().rev() {
                resolved.push(name);
            }
            return resolved;
        }

        match existing.file_name() {
            Some(name) => {
                missing.push(name.to_os_string());
                existing.pop();
            }
            None => return normalized,
        }
    }
}
