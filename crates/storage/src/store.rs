// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`TaskStore`]: the facade the executors, scheduler, stuck detector and
//! CLI all go through instead of hand-building paths.

use std::sync::Arc;
use std::time::Duration;

use archon_core::{Clock, TaskConfig, TaskId, TaskStatus};
use chrono::Utc;

use crate::atomic::atomic_write_json;
use crate::corrections::{self, CorrectionEntry};
use crate::error::{StoreError, StoreResult};
use crate::lock::{TaskLock, DEFAULT_STALE_HORIZON};
use crate::log::{self, LogLevel};
use crate::markers;
use crate::paths::{is_hidden_entry, BasePaths, TaskPaths};

/// Owns the on-disk layout rooted at one base directory.
#[derive(Clone)]
pub struct TaskStore {
    base: BasePaths,
    clock: Arc<dyn Clock>,
}

impl TaskStore {
    pub fn new(base: BasePaths, clock: Arc<dyn Clock>) -> Self {
        Self { base, clock }
    }

    pub fn base(&self) -> &BasePaths {
        &self.base
    }

    pub fn task_paths(&self, task_id: &TaskId) -> TaskPaths {
        self.base.task_dir(task_id)
    }

    /// Creates the task directory if absent. Idempotent.
    pub fn create_task_dir(&self, task_id: &TaskId) -> StoreResult<TaskPaths> {
        let paths = self.task_paths(task_id);
        std::fs::create_dir_all(&paths.dir)
            .map_err(|e| StoreError::io(paths.dir.display().to_string(), e))?;
        Ok(paths)
    }

    pub fn write_config(&self, config: &TaskConfig) -> StoreResult<()> {
        let paths = self.task_paths(&config.task_id);
        atomic_write_json(&paths.config_json(), config)?;
        crate::atomic::atomic_write(&paths.status(), config.status.to_string().as_bytes())
    }

    pub fn read_config(&self, task_id: &TaskId) -> StoreResult<TaskConfig> {
        let paths = self.task_paths(task_id);
        let path = paths.config_json();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(task_id.to_string())
            } else {
                StoreError::io(path.display().to_string(), e)
            }
        })?;
        serde_json::from_str(&contents).map_err(|e| StoreError::MalformedConfig {
            task_id: task_id.to_string(),
            source: e,
        })
    }

    /// Updates both the `status` file and `config.state.status`. If
    /// either write fails the caller sees the error; nothing is left
    /// half-applied in memory since `config.json` is the write that
    /// happens last.
    pub fn set_task_status(&self, task_id: &TaskId, status: TaskStatus) -> StoreResult<()> {
        let mut config = self.read_config(task_id)?;
        config.set_status(status);
        let paths = self.task_paths(task_id);
        crate::atomic::atomic_write(&paths.status(), status.to_string().as_bytes())?;
        atomic_write_json(&paths.config_json(), &config)
    }

    /// Enumerates task directories under the base root, skipping hidden
    /// entries, loading each `config.json`, sorted by `created_at`
    /// descending. A directory whose `config.json` fails to parse is
    /// skipped with a warning rather than failing the whole listing.
    pub fn list_tasks(&self) -> StoreResult<Vec<TaskConfig>> {
        let entries = match std::fs::read_dir(&self.base.base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(self.base.base.display().to_string(), e)),
        };

        let mut configs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(self.base.base.display().to_string(), e))?;
            let path = entry.path();
            if !path.is_dir() || is_hidden_entry(&path) {
                continue;
            }
            let task_id = TaskId::new(path.file_name().unwrap_or_default().to_string_lossy());
            match self.read_config(&task_id) {
                Ok(config) => configs.push(config),
                Err(e) => tracing::warn!(task_id = %task_id, error = %e, "skipping unreadable task directory"),
            }
        }

        configs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(configs)
    }

    pub fn delete_task(&self, task_id: &TaskId) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        match std::fs::remove_dir_all(&paths.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(paths.dir.display().to_string(), e)),
        }
    }

    /// Writes the default `destination.md` a Probe `start()` creates:
    /// the task name, the initial prompt, and a placeholder section for a
    /// human to refine the goal.
    pub fn write_default_destination_md(
        &self,
        task_id: &TaskId,
        name: &str,
        initial_prompt: &str,
    ) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        let contents = format!(
            "# {name}\n\n## Initial prompt\n\n{initial_prompt}\n\n## Refine this goal\n\n<!-- Edit this section to clarify or narrow the destination. -->\n"
        );
        crate::atomic::atomic_write(&paths.destination_md(), contents.as_bytes())
    }

    /// Writes the Cron task's `task.md` and `workflow/workflow.md`
    /// descriptions created by `create()`.
    pub fn write_task_content(
        &self,
        task_id: &TaskId,
        task_content: &str,
        workflow_content: &str,
    ) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        crate::atomic::atomic_write(&paths.task_md(), task_content.as_bytes())?;
        crate::atomic::atomic_write(&paths.workflow_md(), workflow_content.as_bytes())
    }

    pub fn log(&self, task_id: &TaskId, level: LogLevel, message: &str) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        log::append_line(&paths.archon_log(), self.clock.as_ref(), level, message)
    }

    pub fn daemon_log(&self, level: LogLevel, message: &str) -> StoreResult<()> {
        log::append_line(&self.base.daemon_log(), self.clock.as_ref(), level, message)
    }

    pub fn acquire_lock(&self, task_id: &TaskId) -> StoreResult<Option<TaskLock>> {
        self.acquire_lock_with_horizon(task_id, DEFAULT_STALE_HORIZON)
    }

    pub fn acquire_lock_with_horizon(
        &self,
        task_id: &TaskId,
        horizon: Duration,
    ) -> StoreResult<Option<TaskLock>> {
        let paths = self.task_paths(task_id);
        TaskLock::acquire(&paths.task_lock(), self.clock.as_ref(), horizon)
    }

    pub fn set_check_start(&self, task_id: &TaskId) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        markers::set_check_start(&paths.check_start(), self.clock.as_ref())
    }

    pub fn clear_check_start(&self, task_id: &TaskId) -> StoreResult<()> {
        let paths = self.task_paths(task_id);
        markers::clear_check_start(&paths.check_start())
    }

    pub fn check_start_age_secs(&self, task_id: &TaskId) -> Option<f64> {
        let paths = self.task_paths(task_id);
        markers::check_start_age_secs(&paths.check_start(), self.clock.as_ref())
    }

    pub fn append_correction(
        &self,
        task_id: &TaskId,
        issues: Vec<String>,
    ) -> StoreResult<CorrectionEntry> {
        let paths = self.task_paths(task_id);
        corrections::append(&paths.corrections_md(), self.clock.as_ref(), issues)
    }

    pub fn now(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::<Utc>::from_timestamp_millis(self.clock.epoch_ms()).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
