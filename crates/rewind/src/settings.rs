//! Effective process configuration.
//!
//! Later sources override earlier ones: defaults, the config file,
//! `REWIND_UNDO_*` environment variables, then command-line flags.

use crate::Cli;
use anyhow::Context;
use rewind_history::HistoryConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the user config directory.
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub history: HistoryConfig,
    /// Directories tools may operate in.
    pub allowed_roots: Vec<PathBuf>,
    /// Config file that was loaded, if any.
    pub config_file: Option<PathBuf>,
}

impl Settings {
    pub async fn resolve(cli: &Cli, cwd: &Path) -> anyhow::Result<Self> {
        Self::resolve_with(cli, cwd, |name| std::env::var(name).ok()).await
    }

    async fn resolve_with<F>(cli: &Cli, cwd: &Path, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_file = match &cli.config {
            Some(path) => Some(absolute(path, cwd)),
            None => rewind_util::path::config_dir()
                .map(|dir| dir.join(CONFIG_FILE_NAME))
                .filter(|path| path.is_file()),
        };

        let mut history = match &config_file {
            Some(path) => HistoryConfig::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => HistoryConfig::default(),
        };

        history
            .apply_overrides(env)
            .context("applying environment overrides")?;

        if cli.disable_undo {
            history.enabled = false;
        }
        if let Some(max) = cli.max_undo_operations {
            history.max_operations_per_file = max;
        }
        history.validate()?;

        let allowed_roots = if cli.allow.is_empty() {
            vec![cwd.to_path_buf()]
        } else {
            cli.allow.iter().map(|dir| absolute(dir, cwd)).collect()
        };

        debug!(?history, ?allowed_roots, ?config_file, "Resolved settings");

        Ok(Self {
            history,
            allowed_roots,
            config_file,
        })
    }

    /// Project root handed to the tools.
    pub fn root_dir(&self, cwd: &Path) -> PathBuf {
        self.allowed_roots
            .first()
            .cloned()
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
