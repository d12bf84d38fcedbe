// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the [`Runtime`] the CLI acts through: same construction the
//! daemon does, minus the scheduler and stuck-detector ticker, since a
//! one-shot command never needs either. There is no IPC to a running
//! daemon — mutating commands act on the same on-disk state the daemon
//! would, exactly like the executors do when the scheduler fires them.

use std::sync::Arc;

use archon_adapters::RealCliAdapter;
use archon_core::{SystemClock, UuidIdGen};
use archon_daemon::notify_factory;
use archon_engine::{CronExecutor, ProbeExecutor, Runtime, StuckDetector};
use archon_storage::{default_base_dir, BasePaths, TaskStore};

pub struct Context {
    pub store: TaskStore,
    pub runtime: Runtime,
}

impl Context {
    pub fn load() -> anyhow::Result<Self> {
        let base = BasePaths::new(default_base_dir());
        std::fs::create_dir_all(&base.base)?;
        let settings = archon_storage::load_settings(&base.settings_json())
            .map_err(crate::exit_code::store_error)?;
        let store = TaskStore::new(base, Arc::new(SystemClock));
        let cli = Arc::new(RealCliAdapter::new(settings.cli.path.clone()));
        let notifier = notify_factory::build(&settings);
        let runtime = Runtime::new(store.clone(), cli, notifier, settings);
        Ok(Self { store, runtime })
    }

    pub fn id_gen(&self) -> Arc<dyn archon_core::IdGen> {
        Arc::new(UuidIdGen)
    }

    pub fn probe_executor(&self) -> ProbeExecutor {
        ProbeExecutor::new(self.runtime.clone(), self.id_gen())
    }

    pub fn cron_executor(&self) -> CronExecutor {
        CronExecutor::new(self.runtime.clone(), self.id_gen())
    }

    pub fn stuck_detector(&self) -> StuckDetector {
        StuckDetector::new(self.runtime.clone())
    }

    /// Best-effort check for whether a daemon currently holds the
    /// single-instance pid lock.
    pub fn daemon_running(&self) -> bool {
        let path = self.store.base().pid_file();
        let Ok(file) = std::fs::OpenOptions::new().write(true).create(true).open(&path) else {
            return false;
        };
        match fs2::FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                let _ = fs2::FileExt::unlock(&file);
                false
            }
            Err(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
