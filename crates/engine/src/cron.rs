// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Cron Executor: runs a one-shot CLI invocation on a schedule and
//! classifies its output via the Analyzer, tracking a consecutive-failure
//! counter that auto-pauses a runaway task.

use std::path::PathBuf;
use std::time::Duration;

use archon_adapters::{CliError, CronExec};
use archon_analyzer::{analyze_cron_output, should_notify};
use archon_core::{
    AnalysisResult, AnalysisStatus, IdGen, ModeConfig, TaskConfig, TaskId, TaskStatus,
};
use archon_storage::LogLevel;

use crate::error::{RuntimeError, RuntimeResult};
use crate::prompts::cron_prompt;
use crate::runtime::Runtime;

/// Outcome of one [`CronExecutor::execute`] call.
#[derive(Debug, Clone)]
pub enum CronExecOutcome {
    /// A concurrent holder of the task lock exists and is not stale.
    Locked,
    /// The invocation's wall-clock limit elapsed; `consecutive_failures`
    /// was incremented and the task may have been auto-paused.
    Timeout,
    /// The CLI ran to completion and its output was classified.
    Executed(AnalysisResult),
}

/// Owns the Cron lifecycle.
pub struct CronExecutor {
    runtime: Runtime,
    id_gen: std::sync::Arc<dyn IdGen>,
}

impl CronExecutor {
    pub fn new(runtime: Runtime, id_gen: std::sync::Arc<dyn IdGen>) -> Self {
        Self { runtime, id_gen }
    }

    /// Creates a Cron task: persists config with a default notification
    /// policy, writes `task.md` and `workflow/workflow.md`, sets status
    /// `active`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: String,
        description: String,
        project_path: String,
        task_content: String,
        workflow_content: String,
        cron_expression: Option<String>,
        check_interval_minutes: u32,
        timeout_minutes: u32,
    ) -> RuntimeResult<TaskConfig> {
        let task_id = TaskId::new(self.id_gen.next());
        self.runtime.store.create_task_dir(&task_id)?;

        let now = self.runtime.store.now();
        let config = TaskConfig {
            task_id: task_id.clone(),
            name,
            description,
            project_path,
            created_at: now.to_rfc3339(),
            status: TaskStatus::Active,
            state: archon_core::TaskState::new(TaskStatus::Active),
            schedule: archon_core::ScheduleConfig {
                check_interval_minutes,
                cron_expression,
                ..Default::default()
            },
            mode: ModeConfig::Cron {
                execution: archon_core::ExecutionConfig {
                    timeout_minutes,
                    ..Default::default()
                },
                cron_state: archon_core::CronRuntimeState::default(),
                task_content: task_content.clone(),
                workflow_content: workflow_content.clone(),
                notification: archon_core::NotificationRules::default(),
            },
            extra: serde_json::Map::new(),
        };

        self.runtime.store.write_config(&config)?;
        self.runtime
            .store
            .write_task_content(&task_id, &task_content, &workflow_content)?;
        self.runtime.store.log(&task_id, LogLevel::Info, "cron task created")?;

        Ok(config)
    }

    /// Performs one Cron execution: acquires the task lock, invokes the
    /// CLI synchronously under a wall-clock limit, and classifies the
    /// result. Always releases the lock and clears `.check_start` before
    /// returning, on every code path.
    pub async fn execute(&self, task_id: &TaskId) -> RuntimeResult<CronExecOutcome> {
        let Some(lock) = self.runtime.store.acquire_lock(task_id)? else {
            return Ok(CronExecOutcome::Locked);
        };

        let outcome = self.execute_locked(task_id).await;

        let _ = self.runtime.store.clear_check_start(task_id);
        drop(lock);
        outcome
    }

    async fn execute_locked(&self, task_id: &TaskId) -> RuntimeResult<CronExecOutcome> {
        self.runtime.store.set_check_start(task_id)?;
        let mut config = self.runtime.store.read_config(task_id)?;
        let ModeConfig::Cron {
            execution,
            task_content,
            workflow_content,
            ..
        } = &config.mode
        else {
            return Err(RuntimeError::ConfigMissing(format!(
                "{task_id} is not a Cron task"
            )));
        };
        let task_content = task_content.clone();
        let workflow_content = workflow_content.clone();
        let timeout_minutes = execution.timeout_minutes;
        let project_path = config.project_path.clone();

        let now = self.runtime.store.now();
        if let ModeConfig::Cron { execution, .. } = &mut config.mode {
            execution.last_run = Some(now.to_rfc3339());
            execution.last_result = None;
        }
        self.runtime.store.write_config(&config)?;

        let prompt = cron_prompt(&task_content, &workflow_content);
        let exec = CronExec {
            prompt,
            project_path: PathBuf::from(&project_path),
            timeout: Duration::from_secs(timeout_minutes as u64 * 60),
        };

        match self.runtime.cli.execute_cron(exec).await {
            Ok(output) => {
                let result = analyze_cron_output(&output.stdout);
                self.finish_success(task_id, &mut config, output.duration_ms, &result)?;
                Ok(CronExecOutcome::Executed(result))
            }
            Err(CliError::Timeout) => {
                self.finish_timeout(task_id, &mut config).await?;
                Ok(CronExecOutcome::Timeout)
            }
            Err(e) => {
                self.runtime
                    .store
                    .log(task_id, LogLevel::Error, &format!("cron execute failed: {e}"))?;
                Err(RuntimeError::Spawn(e))
            }
        }
    }

    fn finish_success(
        &self,
        task_id: &TaskId,
        config: &mut TaskConfig,
        duration_ms: u64,
        result: &AnalysisResult,
    ) -> RuntimeResult<()> {
        let last_run_at_ms = self.runtime.store.now().timestamp_millis();
        if let ModeConfig::Cron {
            execution,
            cron_state,
            ..
        } = &mut config.mode
        {
            execution.run_count += 1;
            cron_state.run_count += 1;
            cron_state.last_run_at_ms = Some(last_run_at_ms);
            cron_state.last_run_duration_ms = Some(duration_ms as i64);

            if result.status == AnalysisStatus::Error {
                execution.consecutive_failures += 1;
                cron_state.error_count += 1;
                cron_state.last_error = Some(result.summary.clone());
            } else {
                execution.consecutive_failures = 0;
                cron_state.last_error = None;
            }
            execution.last_result = Some(result.status.to_string());
        }

        self.runtime.store.write_config(config)?;
        self.runtime.store.log(
            task_id,
            LogLevel::Info,
            &format!("cron execute: {} ({duration_ms}ms)", result.status),
        )?;
        Ok(())
    }

    async fn finish_timeout(&self, task_id: &TaskId, config: &mut TaskConfig) -> RuntimeResult<()> {
        let mut auto_paused = false;
        if let ModeConfig::Cron {
            execution,
            cron_state,
            ..
        } = &mut config.mode
        {
            execution.consecutive_failures += 1;
            execution.last_result = Some("timeout".to_string());
            cron_state.error_count += 1;
            cron_state.last_error = Some("execution timed out".to_string());
            if execution.consecutive_failures >= execution.max_consecutive_failures {
                auto_paused = true;
            }
        }
        if auto_paused {
            config.set_status(TaskStatus::Paused);
        }

        self.runtime.store.write_config(config)?;
        self.runtime
            .store
            .log(task_id, LogLevel::Warn, "cron execution timed out")?;

        if auto_paused {
            self.runtime
                .notify(
                    "task_error",
                    &format!("{task_id}: auto-paused after repeated timeouts"),
                )
                .await;
        }
        Ok(())
    }

    /// Applies the notify policy for a Cron run's [`AnalysisResult`].
    pub async fn handle(&self, task_id: &TaskId, result: &AnalysisResult) -> RuntimeResult<()> {
        let config = self.runtime.store.read_config(task_id)?;
        let ModeConfig::Cron { notification, .. } = &config.mode else {
            return Err(RuntimeError::ConfigMissing(format!(
                "{task_id} is not a Cron task"
            )));
        };

        if !should_notify(result.status, notification) {
            return Ok(());
        }

        match result.status {
            AnalysisStatus::Error => {
                self.runtime
                    .notify("task_error", &format!("{task_id}: {}", result.summary))
                    .await;
            }
            AnalysisStatus::Warning => {
                self.runtime
                    .notify("task_error", &format!("{task_id}: warning: {}", result.summary))
                    .await;
            }
            AnalysisStatus::Success => {
                self.runtime
                    .notify("task_completed", &format!("{task_id}: {}", result.summary))
                    .await;
            }
            _ => {}
        }
        Ok(())
    }

    pub async fn stop(&self, task_id: &TaskId) -> RuntimeResult<()> {
        self.transition(task_id, TaskStatus::Stopped, "cron stopped").await
    }

    pub async fn pause(&self, task_id: &TaskId) -> RuntimeResult<()> {
        self.transition(task_id, TaskStatus::Paused, "cron paused").await
    }

    pub async fn resume(&self, task_id: &TaskId) -> RuntimeResult<()> {
        self.transition(task_id, TaskStatus::Active, "cron resumed").await
    }

    async fn transition(&self, task_id: &TaskId, status: TaskStatus, message: &str) -> RuntimeResult<()> {
        let Some(lock) = self.runtime.store.acquire_lock(task_id)? else {
            return Err(RuntimeError::Locked);
        };
        self.runtime.store.set_task_status(task_id, status)?;
        self.runtime.store.log(task_id, LogLevel::Info, message)?;
        drop(lock);
        Ok(())
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
