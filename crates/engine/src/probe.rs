// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Probe Executor: owns the lifecycle of one long-lived interactive
//! CLI session per Probe task, tails its transcript, and injects
//! corrections when the Analyzer classifies the session as diverging.

use std::path::PathBuf;
use std::time::Duration;

use archon_adapters::{ProbeResume, ProbeSpawn};
use archon_analyzer::{analyze_probe, read_incremental};
use archon_core::{
    is_pid_alive, AnalysisResult, AnalysisStatus, IdGen, ModeConfig, TaskConfig, TaskId,
    TaskStatus,
};
use archon_storage::LogLevel;

use crate::error::{RuntimeError, RuntimeResult};
use crate::prompts::correction_prompt;
use crate::runtime::Runtime;

/// Outcome of one [`ProbeExecutor::check`] call. Several of these are
/// terminal in their own right (the lock was contended, the process is
/// gone, the transcript isn't resolvable yet) and never reach the
/// Analyzer; only [`ProbeCheckOutcome::Analyzed`] is handed to
/// [`ProbeExecutor::handle`].
#[derive(Debug, Clone)]
pub enum ProbeCheckOutcome {
    /// A concurrent holder of the task lock exists and is not stale.
    Locked,
    /// The child pid is no longer alive; status was transitioned to
    /// `stopped`.
    Stopped,
    /// The transcript path could not be resolved (no session started
    /// yet, or the CLI's session listing didn't contain a match). No
    /// state was mutated besides `last_check`.
    TranscriptMissing,
    /// The Analyzer ran against newly read transcript records.
    Analyzed(AnalysisResult),
}

/// Owns the Probe lifecycle.
pub struct ProbeExecutor {
    runtime: Runtime,
    id_gen: std::sync::Arc<dyn IdGen>,
}

impl ProbeExecutor {
    pub fn new(runtime: Runtime, id_gen: std::sync::Arc<dyn IdGen>) -> Self {
        Self { runtime, id_gen }
    }

    /// Starts a new Probe session: creates the task directory, spawns a
    /// detached CLI process, and persists the task as `active`. A spawn
    /// failure is fatal to the call and leaves no task directory behind.
    #[allow(clippy::too_many_arguments)]
    pub async fn start(
        &self,
        initial_prompt: String,
        project_path: String,
        name: String,
        description: String,
        check_interval_minutes: u32,
        max_auto_corrections: u32,
    ) -> RuntimeResult<TaskConfig> {
        let task_id = TaskId::new(self.id_gen.next());
        let paths = self.runtime.store.create_task_dir(&task_id)?;

        let spawn = ProbeSpawn {
            initial_prompt: initial_prompt.clone(),
            project_path: PathBuf::from(&project_path),
            session_id: task_id.to_string(),
            stdout_log: paths.probe_stdout_log(),
            stderr_log: paths.probe_stderr_log(),
        };

        let handle = match self.runtime.cli.start_probe(spawn).await {
            Ok(handle) => handle,
            Err(e) => {
                // No task directory is left behind on a failed start.
                let _ = self.runtime.store.delete_task(&task_id);
                return Err(RuntimeError::Spawn(e));
            }
        };

        let now = self.runtime.store.now();
        let mut state = archon_core::TaskState::new(TaskStatus::Active);
        state.last_transcript_offset = Some(0);

        let config = TaskConfig {
            task_id: task_id.clone(),
            name: name.clone(),
            description,
            project_path,
            created_at: now.to_rfc3339(),
            status: TaskStatus::Active,
            state,
            schedule: archon_core::ScheduleConfig {
                check_interval_minutes,
                ..Default::default()
            },
            mode: ModeConfig::Probe {
                probe: archon_core::ProbeSection {
                    pid: Some(handle.pid),
                    session_id: task_id.to_string(),
                    initial_prompt: initial_prompt.clone(),
                    transcript_path: None,
                    stdout_log: paths.probe_stdout_log().display().to_string(),
                    stderr_log: paths.probe_stderr_log().display().to_string(),
                },
                correction: archon_core::CorrectionConfig {
                    max_auto_corrections,
                    current_count: 0,
                    ..Default::default()
                },
                criteria: archon_core::CriteriaConfig::for_new_probe(),
            },
            extra: serde_json::Map::new(),
        };

        self.runtime.store.write_config(&config)?;
        self.runtime
            .store
            .write_default_destination_md(&task_id, &name, &initial_prompt)?;
        self.runtime.store.log(
            &task_id,
            LogLevel::Info,
            &format!("probe started, pid={}", handle.pid),
        )?;

        Ok(config)
    }

    /// Performs one Probe check: verifies liveness, reads newly appended
    /// transcript records, and runs the Analyzer over them. Always
    /// releases the task lock and clears `.check_start` before returning,
    /// on every code path.
    pub async fn check(&self, task_id: &TaskId) -> RuntimeResult<ProbeCheckOutcome> {
        let Some(lock) = self.runtime.store.acquire_lock(task_id)? else {
            return Ok(ProbeCheckOutcome::Locked);
        };

        let outcome = self.check_locked(task_id).await;

        let _ = self.runtime.store.clear_check_start(task_id);
        drop(lock);
        outcome
    }

    async fn check_locked(&self, task_id: &TaskId) -> RuntimeResult<ProbeCheckOutcome> {
        self.runtime.store.set_check_start(task_id)?;
        let mut config = self.runtime.store.read_config(task_id)?;
        let ModeConfig::Probe {
            probe, criteria, ..
        } = &config.mode
        else {
            return Err(RuntimeError::ConfigMissing(format!(
                "{task_id} is not a Probe task"
            )));
        };
        let pid = probe.pid;
        let session_id = probe.session_id.clone();
        let existing_transcript_path = probe.transcript_path.clone();
        let criteria = criteria.clone();
        let project_path = config.project_path.clone();

        if let Some(pid) = pid {
            if !is_pid_alive(pid) {
                config.set_status(TaskStatus::Stopped);
                self.runtime.store.write_config(&config)?;
                self.runtime
                    .store
                    .log(task_id, LogLevel::Warn, "probe process is gone, marking stopped")?;
                return Ok(ProbeCheckOutcome::Stopped);
            }
        }

        let transcript_path = match existing_transcript_path {
            Some(path) => Some(path),
            None => {
                let sessions = self
                    .runtime
                    .cli
                    .list_sessions(std::path::Path::new(&project_path))
                    .await?;
                resolve_transcript_path(&sessions, &session_id)
            }
        };

        let Some(transcript_path) = transcript_path else {
            config.state.last_check = Some(self.runtime.store.now().to_rfc3339());
            self.runtime.store.write_config(&config)?;
            self.runtime
                .store
                .log(task_id, LogLevel::Warn, "transcript path not resolved yet")?;
            return Ok(ProbeCheckOutcome::TranscriptMissing);
        };

        let offset = config.state.last_transcript_offset.unwrap_or(0);
        let read = read_incremental(std::path::Path::new(&transcript_path), offset);
        if read.rotated {
            self.runtime
                .store
                .log(task_id, LogLevel::Warn, "transcript rotated, offset reset to 0")?;
        }

        let now = self.runtime.store.now();
        let result = analyze_probe(&read.records, &criteria, now);

        if let ModeConfig::Probe { probe, .. } = &mut config.mode {
            probe.transcript_path = Some(transcript_path);
        }
        config.state.last_transcript_offset = Some(read.offset);
        config.state.last_check = Some(now.to_rfc3339());
        self.runtime.store.write_config(&config)?;
        self.runtime.store.log(
            task_id,
            LogLevel::Info,
            &format!("check: {} ({} records read)", result.status, read.records.len()),
        )?;

        Ok(ProbeCheckOutcome::Analyzed(result))
    }

    /// Applies the correction/notification policy for a Probe check's
    /// [`AnalysisResult`]. Only meaningful for
    /// [`ProbeCheckOutcome::Analyzed`]; other outcomes already completed
    /// whatever state transition they needed inside `check`.
    pub async fn handle(&self, task_id: &TaskId, result: &AnalysisResult) -> RuntimeResult<()> {
        match result.status {
            AnalysisStatus::Error => self.handle_error(task_id, result).await,
            AnalysisStatus::Stuck => {
                self.runtime
                    .notify("task_error", &format!("{task_id}: probe stuck"))
                    .await;
                Ok(())
            }
            AnalysisStatus::Completed => {
                self.runtime.store.set_task_status(task_id, TaskStatus::Stopped)?;
                self.runtime
                    .notify("task_completed", &format!("{task_id}: probe completed"))
                    .await;
                Ok(())
            }
            _ => {
                self.runtime
                    .store
                    .log(task_id, LogLevel::Info, "no intervention")?;
                Ok(())
            }
        }
    }

    async fn handle_error(&self, task_id: &TaskId, result: &AnalysisResult) -> RuntimeResult<()> {
        let Some(lock) = self.runtime.store.acquire_lock(task_id)? else {
            return Err(RuntimeError::Locked);
        };

        let mut config = self.runtime.store.read_config(task_id)?;
        let ModeConfig::Probe {
            probe, correction, ..
        } = &mut config.mode
        else {
            return Err(RuntimeError::ConfigMissing(format!(
                "{task_id} is not a Probe task"
            )));
        };

        if correction.current_count >= correction.max_auto_corrections {
            drop(lock);
            self.runtime
                .notify(
                    "correction_needed",
                    &format!("{task_id}: max auto-corrections reached, needs manual intervention"),
                )
                .await;
            return Ok(());
        }

        let prompt = correction_prompt(&result.issues);
        let resume = ProbeResume {
            session_id: probe.session_id.clone(),
            prompt: prompt.clone(),
            project_path: PathBuf::from(&config.project_path),
        };
        self.runtime.cli.resume_probe(resume).await?;

        let ModeConfig::Probe { correction, .. } = &mut config.mode else {
            unreachable!("mode checked above");
        };
        correction.current_count += 1;
        self.runtime.store.write_config(&config)?;

        let issue_lines = result
            .issues
            .iter()
            .map(|i| format!("[{}] {}", i.kind, i.detail.chars().take(200).collect::<String>()))
            .collect();
        self.runtime.store.append_correction(task_id, issue_lines)?;
        let (current_count, max_auto_corrections) = match &config.mode {
            ModeConfig::Probe { correction, .. } => {
                (correction.current_count, correction.max_auto_corrections)
            }
            ModeConfig::Cron { .. } => (0, 0),
        };
        self.runtime.store.log(
            task_id,
            LogLevel::Info,
            &format!("injected correction {current_count}/{max_auto_corrections}"),
        )?;
        drop(lock);
        Ok(())
    }

    /// Stops a Probe session: sends a soft termination signal, polling up
    /// to `timeout_seconds` before a hard kill. Status is transitioned to
    /// `stopped` even if the process was already gone.
    pub async fn stop(&self, task_id: &TaskId, graceful: bool, timeout_seconds: u64) -> RuntimeResult<()> {
        let Some(lock) = self.runtime.store.acquire_lock(task_id)? else {
            return Err(RuntimeError::Locked);
        };

        let config = self.runtime.store.read_config(task_id)?;
        if let ModeConfig::Probe { probe, .. } = &config.mode {
            if let Some(pid) = probe.pid {
                let timeout = if graceful {
                    Duration::from_secs(timeout_seconds)
                } else {
                    Duration::ZERO
                };
                self.runtime.cli.stop(pid, timeout).await?;
            }
        }

        self.runtime.store.set_task_status(task_id, TaskStatus::Stopped)?;
        self.runtime.store.log(task_id, LogLevel::Info, "probe stopped")?;
        drop(lock);
        Ok(())
    }
}

/// Resolves a Probe's transcript path from the CLI's opaque session
/// listing: prefers an exact match on `session_id`, falls back to a
/// single unambiguous result, otherwise gives up for this call.
fn resolve_transcript_path(sessions: &[String], session_id: &str) -> Option<String> {
    if let Some(exact) = sessions.iter().find(|s| {
        s.as_str() == session_id || s.ends_with(&format!("/{session_id}.jsonl"))
    }) {
        return Some(exact.clone());
    }
    if sessions.len() == 1 {
        return Some(sessions[0].clone());
    }
    None
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
