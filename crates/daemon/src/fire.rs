// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`SchedulerCallback`] the daemon registers: re-checks the task's
//! on-disk status before doing any work (races with a status change
//! between listing and firing are expected and must be harmless), then
//! dispatches to the matching executor's check/execute + handle pair.

use std::sync::Arc;

use archon_core::{TaskId, TaskMode, TaskStatus};
use archon_engine::{CronExecOutcome, CronExecutor, ProbeCheckOutcome, ProbeExecutor, SchedulerCallback};
use archon_storage::TaskStore;
use async_trait::async_trait;

pub struct Fire {
    store: TaskStore,
    probe: Arc<ProbeExecutor>,
    cron: Arc<CronExecutor>,
}

impl Fire {
    pub fn new(store: TaskStore, probe: Arc<ProbeExecutor>, cron: Arc<CronExecutor>) -> Self {
        Self { store, probe, cron }
    }
}

#[async_trait]
impl SchedulerCallback for Fire {
    async fn fire(&self, task_id: TaskId, mode: TaskMode) {
        let status = match self.store.read_config(&task_id) {
            Ok(config) => config.status,
            Err(e) => {
                tracing::warn!(%task_id, error = %e, "skipping firing: config unreadable");
                return;
            }
        };
        if status != TaskStatus::Active {
            tracing::debug!(%task_id, %status, "skipping firing: task not active");
            return;
        }

        match mode {
            TaskMode::Probe => self.fire_probe(&task_id).await,
            TaskMode::Cron => self.fire_cron(&task_id).await,
        }
    }
}

impl Fire {
    async fn fire_probe(&self, task_id: &TaskId) {
        match self.probe.check(task_id).await {
            Ok(ProbeCheckOutcome::Analyzed(result)) => {
                if let Err(e) = self.probe.handle(task_id, &result).await {
                    tracing::warn!(%task_id, error = %e, "probe handle failed");
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%task_id, error = %e, "probe check failed"),
        }
    }

    async fn fire_cron(&self, task_id: &TaskId) {
        match self.cron.execute(task_id).await {
            Ok(CronExecOutcome::Executed(result)) => {
                if let Err(e) = self.cron.handle(task_id, &result).await {
                    tracing::warn!(%task_id, error = %e, "cron handle failed");
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%task_id, error = %e, "cron execute failed"),
        }
    }
}

#[cfg(test)]
#[path = "fire_tests.rs"]
mod tests;
