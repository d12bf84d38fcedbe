// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real process-backed [`CliAdapter`]. Probe sessions are detached into a
//! new process group (a safe, stable `std`/`tokio` method — this
//! workspace forbids `unsafe_code`, so there is no `setsid()` FFI call)
//! so a supervisor hangup never takes the child down with it.

use std::os::unix::process::CommandExt as _;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::{CliAdapter, CliError, CronExec, CronOutput, ProbeHandle, ProbeResume, ProbeSpawn};

/// Grace period between spawning a Probe session and checking liveness.
const SPAWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct RealCliAdapter {
    cli_path: String,
}

impl RealCliAdapter {
    pub fn new(cli_path: impl Into<String>) -> Self {
        Self {
            cli_path: cli_path.into(),
        }
    }

    fn command(&self) -> Command {
        let mut std_command = std::process::Command::new(&self.cli_path);
        std_command.process_group(0);
        Command::from(std_command)
    }
}

#[async_trait]
impl CliAdapter for RealCliAdapter {
    async fn start_probe(&self, spawn: ProbeSpawn) -> Result<ProbeHandle, CliError> {
        let stdout_file = std::fs::File::create(&spawn.stdout_log)?;
        let stderr_file = std::fs::File::create(&spawn.stderr_log)?;

        let mut child = self
            .command()
            .arg("-p")
            .arg(&spawn.initial_prompt)
            .arg("--session-id")
            .arg(&spawn.session_id)
            .current_dir(&spawn.project_path)
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file))
            .spawn()
            .map_err(|e| CliError::SpawnFailed(e.to_string()))?;

        let pid = child
            .id()
            .ok_or_else(|| CliError::SpawnFailed("child exited immediately".to_string()))?;

        // The child is detached; don't block on it, just reap it in the
        // background whenever it eventually exits.
        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        tokio::time::sleep(SPAWN_GRACE).await;
        if !archon_core::is_pid_alive(pid) {
            return Err(CliError::SpawnFailed(format!(
                "probe process {pid} exited within the startup grace period"
            )));
        }

        Ok(ProbeHandle { pid })
    }

    async fn resume_probe(&self, resume: ProbeResume) -> Result<(), CliError> {
        let mut child = self
            .command()
            .arg("--resume")
            .arg(&resume.session_id)
            .arg("-p")
            .arg(&resume.prompt)
            .current_dir(&resume.project_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CliError::SpawnFailed(e.to_string()))?;

        tokio::spawn(async move {
            let _ = child.wait().await;
        });
        Ok(())
    }

    async fn execute_cron(&self, exec: CronExec) -> Result<CronOutput, CliError> {
        let mut child = self
            .command()
            .arg("-p")
            .arg(&exec.prompt)
            .current_dir(&exec.project_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CliError::SpawnFailed(e.to_string()))?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| CliError::SpawnFailed("missing stdout pipe".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| CliError::SpawnFailed("missing stderr pipe".to_string()))?;

        let stdout_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stdout_pipe.read_to_string(&mut buf).await;
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr_pipe.read_to_string(&mut buf).await;
            buf
        });

        let start = Instant::now();
        let wait_result = tokio::time::timeout(exec.timeout, child.wait()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match wait_result {
            Ok(Ok(status)) => {
                let stdout = stdout_task.await.unwrap_or_default();
                let stderr = stderr_task.await.unwrap_or_default();
                Ok(CronOutput {
                    stdout,
                    stderr,
                    exit_code: status.code(),
                    duration_ms,
                })
            }
            Ok(Err(e)) => Err(CliError::Io(e)),
            Err(_elapsed) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                Err(CliError::Timeout)
            }
        }
    }

    async fn list_sessions(&self, project_path: &Path) -> Result<Vec<String>, CliError> {
        let output = self
            .command()
            .arg("--list-sessions")
            .current_dir(project_path)
            .output()
            .await
            .map_err(|e| CliError::SpawnFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
    }

    async fn stop(&self, pid: u32, timeout: Duration) -> Result<(), CliError> {
        let _ = Command::new("kill").arg("-TERM").arg(pid.to_string()).status().await;

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if !archon_core::is_pid_alive(pid) {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        if archon_core::is_pid_alive(pid) {
            let _ = Command::new("kill").arg("-KILL").arg(pid.to_string()).status().await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
