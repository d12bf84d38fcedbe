// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Stuck Detector: scans every active task for three independent
//! stall conditions — a hung check marker, a Probe transcript that has
//! gone quiet, or a Cron run that has exceeded its own timeout without
//! the executor noticing — and applies the matching recovery action.

use chrono::{DateTime, Utc};

use archon_core::{ModeConfig, StuckInfo, StuckType, TaskConfig, TaskStatus};
use archon_storage::LogLevel;

use crate::error::RuntimeResult;
use crate::runtime::Runtime;

/// Age past which a stale `.check_start` marker is considered stuck.
const ARCHON_CHECK_TIMEOUT_MINUTES: f64 = 5.0;
/// Age past which a Probe transcript with no new output is considered stuck.
const PROBE_NO_OUTPUT_MINUTES: i64 = 60;

/// Scans all tasks for stalls and applies the matching handler.
pub struct StuckDetector {
    runtime: Runtime,
}

impl StuckDetector {
    pub fn new(runtime: Runtime) -> Self {
        Self { runtime }
    }

    /// Runs one detection pass over every active task. Writes a summary
    /// line to the daemon log and fires one notification per affected
    /// task; returns every [`StuckInfo`] found.
    pub async fn run_pass(&self) -> RuntimeResult<Vec<StuckInfo>> {
        let tasks = self.runtime.store.list_tasks()?;
        let mut found = Vec::new();

        for config in tasks.iter().filter(|t| t.status == TaskStatus::Active) {
            found.extend(self.check_archon_timeout(config).await?);
            found.extend(self.check_task_specific(config).await?);
        }

        self.runtime.store.daemon_log(
            LogLevel::Info,
            &format!("stuck detector pass: {} stall(s) found", found.len()),
        )?;

        Ok(found)
    }

    async fn check_archon_timeout(&self, config: &TaskConfig) -> RuntimeResult<Option<StuckInfo>> {
        let Some(age_secs) = self.runtime.store.check_start_age_secs(&config.task_id) else {
            return Ok(None);
        };
        if age_secs / 60.0 <= ARCHON_CHECK_TIMEOUT_MINUTES {
            return Ok(None);
        }

        let Some(lock) = self.runtime.store.acquire_lock(&config.task_id)? else {
            return Ok(None);
        };
        self.runtime.store.clear_check_start(&config.task_id)?;
        drop(lock);

        let duration_minutes = age_secs / 60.0;
        let info = StuckInfo {
            task_id: config.task_id.clone(),
            task_mode: config.task_mode(),
            stuck_type: StuckType::ArchonCheckTimeout,
            stuck_duration_minutes: duration_minutes,
            details: format!("check marker stale for {duration_minutes:.1} minutes"),
        };
        self.runtime
            .store
            .log(&config.task_id, LogLevel::Warn, &info.details)?;
        self.runtime
            .notify("task_error", &format!("{}: {}", config.task_id, info.details))
            .await;
        Ok(Some(info))
    }

    async fn check_task_specific(&self, config: &TaskConfig) -> RuntimeResult<Option<StuckInfo>> {
        match &config.mode {
            ModeConfig::Probe { probe, .. } => self.check_probe_no_output(config, probe).await,
            ModeConfig::Cron { execution, .. } => self.check_cron_timeout(config, execution).await,
        }
    }

    async fn check_probe_no_output(
        &self,
        config: &TaskConfig,
        probe: &archon_core::ProbeSection,
    ) -> RuntimeResult<Option<StuckInfo>> {
        let Some(transcript_path) = &probe.transcript_path else {
            return Ok(None);
        };
        let Ok(metadata) = std::fs::metadata(transcript_path) else {
            return Ok(None);
        };
        let Ok(modified) = metadata.modified() else {
            return Ok(None);
        };
        let modified: DateTime<Utc> = modified.into();
        let now = self.runtime.store.now();
        let idle_minutes = now.signed_duration_since(modified).num_minutes();
        if idle_minutes <= PROBE_NO_OUTPUT_MINUTES {
            return Ok(None);
        }

        let Some(lock) = self.runtime.store.acquire_lock(&config.task_id)? else {
            return Ok(None);
        };
        self.runtime
            .store
            .set_task_status(&config.task_id, TaskStatus::Stuck)?;
        drop(lock);

        let info = StuckInfo {
            task_id: config.task_id.clone(),
            task_mode: config.task_mode(),
            stuck_type: StuckType::ProbeNoOutput,
            stuck_duration_minutes: idle_minutes as f64,
            details: format!("transcript idle for {idle_minutes} minutes"),
        };
        self.runtime
            .store
            .log(&config.task_id, LogLevel::Warn, &info.details)?;
        self.runtime
            .notify("task_error", &format!("{}: {}", config.task_id, info.details))
            .await;
        Ok(Some(info))
    }

    async fn check_cron_timeout(
        &self,
        config: &TaskConfig,
        execution: &archon_core::ExecutionConfig,
    ) -> RuntimeResult<Option<StuckInfo>> {
        if execution.last_result.is_some() {
            return Ok(None);
        }
        let Some(last_run) = &execution.last_run else {
            return Ok(None);
        };
        let Ok(last_run_at) = DateTime::parse_from_rfc3339(last_run) else {
            return Ok(None);
        };
        let last_run_at = last_run_at.with_timezone(&Utc);
        let now = self.runtime.store.now();
        let elapsed_minutes = now.signed_duration_since(last_run_at).num_minutes();
        if elapsed_minutes <= execution.timeout_minutes as i64 {
            return Ok(None);
        }

        let Some(lock) = self.runtime.store.acquire_lock(&config.task_id)? else {
            return Ok(None);
        };
        let mut fresh = self.runtime.store.read_config(&config.task_id)?;
        if let ModeConfig::Cron { execution, .. } = &mut fresh.mode {
            execution.last_result = Some("timeout".to_string());
            execution.consecutive_failures += 1;
        }
        self.runtime.store.write_config(&fresh)?;
        drop(lock);

        let info = StuckInfo {
            task_id: config.task_id.clone(),
            task_mode: config.task_mode(),
            stuck_type: StuckType::CronExecutionTimeout,
            stuck_duration_minutes: elapsed_minutes as f64,
            details: format!("execution running for {elapsed_minutes} minutes past its timeout"),
        };
        self.runtime
            .store
            .log(&config.task_id, LogLevel::Warn, &info.details)?;
        self.runtime
            .notify("task_error", &format!("{}: {}", config.task_id, info.details))
            .await;
        Ok(Some(info))
    }
}

#[cfg(test)]
#[path = "stuck_tests.rs"]
mod tests;
