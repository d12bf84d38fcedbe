// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The explicit `Runtime` value: carries the state store, the CLI and
//! notifier adapters, settings, and the clock. Constructed once at
//! daemon (or CLI) startup and passed into every executor call instead
//! of being retrieved from process-wide globals.

use std::sync::Arc;

use archon_adapters::{CliAdapter, NotifyAdapter};
use archon_core::{Clock, GlobalSettings, SystemClock};
use archon_storage::TaskStore;

/// Shared context every executor, the scheduler, and the stuck detector
/// are constructed with.
#[derive(Clone)]
pub struct Runtime {
    pub store: TaskStore,
    pub cli: Arc<dyn CliAdapter>,
    pub notifier: Arc<dyn NotifyAdapter>,
    pub settings: GlobalSettings,
    pub clock: Arc<dyn Clock>,
}

impl Runtime {
    pub fn new(
        store: TaskStore,
        cli: Arc<dyn CliAdapter>,
        notifier: Arc<dyn NotifyAdapter>,
        settings: GlobalSettings,
    ) -> Self {
        Self {
            store,
            cli,
            notifier,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fires a best-effort notification. Failures are logged and
    /// swallowed: no executor ever fails because a notification did.
    pub async fn notify(&self, title: &str, message: &str) {
        if !self.settings.notifications.enabled {
            return;
        }
        if let Err(e) = self.notifier.notify(title, message).await {
            tracing::warn!(%title, error = %e, "notification delivery failed");
        }
    }
}
