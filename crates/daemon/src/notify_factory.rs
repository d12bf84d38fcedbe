// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the [`NotifyAdapter`] backend named by
//! `settings.notifications.method`.

use std::sync::Arc;

use archon_adapters::{DesktopNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter, WebhookNotifyAdapter};
use archon_core::GlobalSettings;

/// Selects a notifier backend from `settings.notifications`. An
/// unrecognized method, or a webhook/slack method missing its URL,
/// falls back to the no-op sink with a warning rather than failing
/// daemon startup.
pub fn build(settings: &GlobalSettings) -> Arc<dyn NotifyAdapter> {
    match settings.notifications.method.as_str() {
        "system" => Arc::new(DesktopNotifyAdapter::new()),
        "webhook" => match &settings.notifications.webhook_url {
            Some(url) => Arc::new(WebhookNotifyAdapter::generic(url.clone())),
            None => {
                tracing::warn!("notifications.method = webhook but webhook_url is unset, using no-op");
                Arc::new(NoOpNotifyAdapter::new())
            }
        },
        "slack" => match &settings.notifications.slack_webhook {
            Some(url) => Arc::new(WebhookNotifyAdapter::slack(url.clone())),
            None => {
                tracing::warn!("notifications.method = slack but slack_webhook is unset, using no-op");
                Arc::new(NoOpNotifyAdapter::new())
            }
        },
        "noop" => Arc::new(NoOpNotifyAdapter::new()),
        other => {
            tracing::warn!(method = %other, "unrecognized notification method, using no-op");
            Arc::new(NoOpNotifyAdapter::new())
        }
    }
}

#[cfg(test)]
#[path = "notify_factory_tests.rs"]
mod tests;
