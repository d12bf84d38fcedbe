// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake CLI adapter for deterministic testing of the Probe and Cron
//! executors without spawning a real process.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CliAdapter, CliError, CronExec, CronOutput, ProbeHandle, ProbeResume, ProbeSpawn};

/// Recorded call to [`FakeCliAdapter`].
#[derive(Debug, Clone)]
pub enum CliCall {
    StartProbe { session_id: String },
    ResumeProbe { session_id: String, prompt: String },
    ExecuteCron { prompt: String },
    ListSessions,
    Stop { pid: u32 },
}

struct FakeCliState {
    calls: Vec<CliCall>,
    next_pid: u32,
    start_probe_error: Option<String>,
    cron_output: Option<CronOutput>,
    cron_error: Option<CliError>,
    sessions: Vec<String>,
}

/// Scriptable stand-in for [`RealCliAdapter`]. Records every call and lets
/// tests pin down exactly what the "external CLI" returns.
#[derive(Clone)]
pub struct FakeCliAdapter {
    inner: Arc<Mutex<FakeCliState>>,
}

impl Default for FakeCliAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCliAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeCliState {
                calls: Vec::new(),
                next_pid: 9000,
                start_probe_error: None,
                cron_output: None,
                cron_error: None,
                sessions: Vec::new(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<CliCall> {
        self.inner.lock().calls.clone()
    }

    /// Makes the next `start_probe` call fail with `message`.
    pub fn fail_start_probe(&self, message: impl Into<String>) {
        self.inner.lock().start_probe_error = Some(message.into());
    }

    /// Sets the stdout/exit-code/duration `execute_cron` returns next.
    pub fn set_cron_output(&self, output: CronOutput) {
        self.inner.lock().cron_output = Some(output);
    }

    /// Makes the next `execute_cron` call fail, e.g. with [`CliError::Timeout`].
    pub fn fail_cron(&self, error: CliError) {
        self.inner.lock().cron_error = Some(error);
    }

    pub fn set_sessions(&self, sessions: Vec<String>) {
        self.inner.lock().sessions = sessions;
    }
}

#[async_trait]
impl CliAdapter for FakeCliAdapter {
    async fn start_probe(&self, spawn: ProbeSpawn) -> Result<ProbeHandle, CliError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::StartProbe {
            session_id: spawn.session_id.clone(),
        });
        if let Some(message) = inner.start_probe_error.take() {
            return Err(CliError::SpawnFailed(message));
        }
        let pid = inner.next_pid;
        inner.next_pid += 1;
        Ok(ProbeHandle { pid })
    }

    async fn resume_probe(&self, resume: ProbeResume) -> Result<(), CliError> {
        self.inner.lock().calls.push(CliCall::ResumeProbe {
            session_id: resume.session_id.clone(),
            prompt: resume.prompt.clone(),
        });
        Ok(())
    }

    async fn execute_cron(&self, exec: CronExec) -> Result<CronOutput, CliError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::ExecuteCron {
            prompt: exec.prompt.clone(),
        });
        if let Some(error) = inner.cron_error.take() {
            return Err(error);
        }
        Ok(inner.cron_output.take().unwrap_or(CronOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 0,
        }))
    }

    async fn list_sessions(&self, _project_path: &std::path::Path) -> Result<Vec<String>, CliError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::ListSessions);
        Ok(inner.sessions.clone())
    }

    async fn stop(&self, pid: u32, _timeout: Duration) -> Result<(), CliError> {
        self.inner.lock().calls.push(CliCall::Stop { pid });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
