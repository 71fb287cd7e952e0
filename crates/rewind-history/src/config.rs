//! Undo history configuration.
//!
//! Read once at process start and immutable afterwards. Sources, later ones
//! overriding earlier ones:
//! 1. Defaults (`enabled = true`, `maxOperationsPerFile = 10`)
//! 2. A JSON or JSONC config file
//! 3. `REWIND_UNDO_ENABLED` / `REWIND_UNDO_MAX_OPERATIONS`

use crate::{HistoryError, HistoryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`HistoryConfig::enabled`].
pub const ENV_UNDO_ENABLED: &str = "REWIND_UNDO_ENABLED";

/// Environment variable overriding [`HistoryConfig::max_operations_per_file`].
pub const ENV_UNDO_MAX_OPERATIONS: &str = "REWIND_UNDO_MAX_OPERATIONS";

/// Configuration for the undo history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Whether operations are recorded and can be undone.
    pub enabled: bool,

    /// Maximum number of operations kept per file.
    pub max_operations_per_file: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_operations_per_file: 10,
        }
    }
}

impl HistoryConfig {
    /// A configuration with history switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the per-file capacity.
    pub fn with_max_operations(mut self, max_operations_per_file: usize) -> Self {
        self.max_operations_per_file = max_operations_per_file;
        self
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> HistoryResult<()> {
        if self.max_operations_per_file == 0 {
            return Err(HistoryError::config(
                "maxOperationsPerFile must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON or JSONC file.
    pub async fn load(path: &Path) -> HistoryResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            HistoryError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::parse_jsonc(&content, &path.display().to_string())?;
        debug!(path = %path.display(), ?config, "Loaded history config");
        Ok(config)
    }

    /// Apply `REWIND_UNDO_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> HistoryResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> HistoryResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_UNDO_ENABLED) {
            self.enabled = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(HistoryError::config(format!(
                        "{ENV_UNDO_ENABLED} must be a boolean, got '{other}'"
                    )))
                }
            };
        }

        if let Some(value) = lookup(ENV_UNDO_MAX_OPERATIONS) {
            self.max_operations_per_file = value.trim().parse().map_err(|_| {
                HistoryError::config(format!(
                    "{ENV_UNDO_MAX_OPERATIONS} must be a positive integer, got '{value}'"
                ))
            })?;
        }

        self.validate()
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> HistoryResult<Self> {
        let stripped = strip_comments(content);
        let config: Self = serde_json::from_str(&stripped)
            .map_err(|e| HistoryError::config(format!("invalid config at {source}: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Strip `//` and `/* */` comments outside of string literals.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            result.push(c);
            continue;
        }

        if !in_string && c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == '\n' {
                            result.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = ' ';
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        if c == '\n' {
                            result.push('\n');
                        }
                        prev = c;
                    }
                    continue;
                }
                _ => {}
            }
        }

        result.push(c);
    }

    result
}
