// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external "CLI" assistant adapter: starts and resumes
//! interactive Probe sessions, runs one-shot Cron invocations, and
//! discovers transcript locations.

mod process;

pub use process::RealCliAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CliCall, FakeCliAdapter};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the CLI adapter.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to spawn CLI process: {0}")]
    SpawnFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CLI invocation exceeded its timeout")]
    Timeout,
}

/// Arguments to start a new interactive Probe session.
#[derive(Debug, Clone)]
pub struct ProbeSpawn {
    pub initial_prompt: String,
    pub project_path: PathBuf,
    pub session_id: String,
    pub stdout_log: PathBuf,
    pub stderr_log: PathBuf,
}

/// The detached child process backing a Probe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeHandle {
    pub pid: u32,
}

/// Arguments to fire-and-forget a correction resume.
#[derive(Debug, Clone)]
pub struct ProbeResume {
    pub session_id: String,
    pub prompt: String,
    pub project_path: PathBuf,
}

/// Arguments for a synchronous, timeout-bounded Cron invocation.
#[derive(Debug, Clone)]
pub struct CronExec {
    pub prompt: String,
    pub project_path: PathBuf,
    pub timeout: Duration,
}

/// Result of one Cron invocation.
#[derive(Debug, Clone)]
pub struct CronOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

/// The external CLI assistant, abstracted so executors can be tested
/// against a [`FakeCliAdapter`] instead of spawning a real process.
#[async_trait]
pub trait CliAdapter: Send + Sync + 'static {
    /// Starts a detached interactive session. Returns once the process has
    /// had a brief grace period to come up and liveness has been verified.
    async fn start_probe(&self, spawn: ProbeSpawn) -> Result<ProbeHandle, CliError>;

    /// Fire-and-forget resume of an existing session with a correction
    /// prompt; the new invocation's pid is not tracked.
    async fn resume_probe(&self, resume: ProbeResume) -> Result<(), CliError>;

    /// Runs one Cron invocation to completion or until `exec.timeout`
    /// elapses, whichever comes first.
    async fn execute_cron(&self, exec: CronExec) -> Result<CronOutput, CliError>;

    /// Opaque external capability: lists session identifiers known to the
    /// CLI for `project_path`, used to resolve a Probe's transcript path
    /// the first time it is needed.
    async fn list_sessions(&self, project_path: &std::path::Path) -> Result<Vec<String>, CliError>;

    /// Sends a soft termination signal to `pid`, polling up to
    /// `timeout` before a hard kill.
    async fn stop(&self, pid: u32, timeout: Duration) -> Result<(), CliError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
