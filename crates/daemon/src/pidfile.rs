// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard: an exclusively-locked pid file at
//! `<base>/archon.pid`. Holding the lock is what enforces "one daemon
//! per base directory", not the pid value itself — the pid is written
//! purely for operators and external process managers to read.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PidFileError {
    #[error("archond is already running (lock held on {0})")]
    AlreadyRunning(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Holds the exclusive lock on the pid file for the lifetime of the
/// daemon process. Dropping it releases the lock and removes the file.
pub struct DaemonLock {
    path: PathBuf,
    file: File,
}

impl DaemonLock {
    /// Acquires the lock at `path`, writing the current pid once held.
    /// Fails immediately (never blocks) if another process already holds
    /// it.
    pub fn acquire(path: &Path) -> Result<Self, PidFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        file.try_lock_exclusive()
            .map_err(|_| PidFileError::AlreadyRunning(path.to_path_buf()))?;

        file.set_len(0)?;
        let mut file = file;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

impl Drop for DaemonLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
