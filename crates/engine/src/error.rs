// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the Probe/Cron executors, the Scheduler, and the
//! Stuck Detector.

use thiserror::Error;

use archon_adapters::CliError;
use archon_storage::StoreError;

/// Errors any executor or scheduler operation can surface.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A concurrent holder of the task lock exists and is not stale.
    #[error("task lock is held by another process")]
    Locked,
    /// The Cron invocation's wall-clock limit elapsed.
    #[error("operation timed out")]
    Timeout,
    /// `config.json` is missing or malformed for the given task.
    #[error("task config missing or malformed: {0}")]
    ConfigMissing(String),
    /// State store I/O failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Failure to spawn, resume, or signal the external CLI.
    #[error(transparent)]
    Spawn(#[from] CliError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
