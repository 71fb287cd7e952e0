//! Shared utilities for rewind.
//!
//! This crate provides common utilities used across the rewind workspace:
//! - Logging setup with tracing
//! - Path normalization and lenient canonicalization

pub mod log;
pub mod path;

pub use log::LogLevel;
