// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget notification adapters: local desktop toast,
//! a generic/Slack-shaped webhook, and a no-op sink for tests and
//! `notifications.enabled = false`.

mod desktop;
mod noop;
mod webhook;

pub use desktop::DesktopNotifyAdapter;
pub use noop::NoOpNotifyAdapter;
pub use webhook::WebhookNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations (always swallowed by callers, per).
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for sending best-effort, fire-and-forget notifications.
#[async_trait]
pub trait NotifyAdapter: Send + Sync + 'static {
    /// Sends a notification with a title and message body. Failures are
    /// logged by the implementation and never propagated as a fatal error
    /// to the executor that triggered them.
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
