// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only task and daemon logging: `[YYYY-MM-DD HH:MM:SS]
//! [LEVEL] message\n`, appended under an exclusive file handle.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use archon_core::Clock;
use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};

/// Severity tag written alongside each log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Appends one formatted line to the log at `path`, creating it (and its
/// parent directory) if absent.
pub fn append_line(path: &Path, clock: &dyn Clock, level: LogLevel, message: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent.display().to_string(), e))?;
    }

    let now = DateTime::<Utc>::from_timestamp_millis(clock.epoch_ms()).unwrap_or_else(Utc::now);
    let line = format!(
        "[{}] [{}] {}\n",
        now.format("%Y-%m-%d %H:%M:%S"),
        level.as_str(),
        message
    );

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path.display().to_string(), e))?;
    file.write_all(line.as_bytes())
        .map_err(|e| StoreError::io(path.display().to_string(), e))?;
    Ok(())
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
