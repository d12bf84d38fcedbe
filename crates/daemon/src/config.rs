// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: the base directory (and every path rooted at
//! it), plus the [`GlobalSettings`] loaded from `settings.json`.

use std::ffi::OsString;
use std::path::PathBuf;

use archon_core::GlobalSettings;
use archon_storage::{default_base_dir, BasePaths};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] archon_storage::StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log path {0} has no parent directory or file name")]
    InvalidLogPath(PathBuf),
}

/// Everything the daemon needs at startup, loaded once.
#[derive(Clone)]
pub struct Config {
    pub base: BasePaths,
    pub settings: GlobalSettings,
    pub log_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_file_name: OsString,
    pub pid_path: PathBuf,
}

impl Config {
    /// Loads settings from `<base>/settings.json` (defaulted if absent)
    /// and computes every ambient path rooted at the base directory.
    /// The base directory defaults to `~/.claude/daemon-archon`,
    /// overridable via `ARCHON_BASE_DIR`.
    pub fn load() -> Result<Self, ConfigError> {
        let base = BasePaths::new(default_base_dir());
        std::fs::create_dir_all(&base.base)?;
        let settings = archon_storage::load_settings(&base.settings_json())?;
        let log_path = base.daemon_log();
        let log_dir = log_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidLogPath(log_path.clone()))?
            .to_path_buf();
        let log_file_name = log_path
            .file_name()
            .ok_or_else(|| ConfigError::InvalidLogPath(log_path.clone()))?
            .to_os_string();
        Ok(Self {
            log_path,
            log_dir,
            log_file_name,
            pid_path: base.pid_file(),
            base,
            settings,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
