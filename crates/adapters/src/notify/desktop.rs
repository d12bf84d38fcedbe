// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local desktop notification backend ( `method = "system"`), backed
//! by `notify-rust`'s per-OS toast implementation.

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            // Pre-set the bundle identifier so mac-notification-sys skips its
            // NSAppleScript lookup, which blocks forever in a daemon process
            // without Automation permissions.
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let message = message.to_string();
        // notify-rust's `show()` is synchronous on several backends; run it
        // on the blocking pool so it never stalls the async runtime.
        tokio::task::spawn_blocking(move || match notify_rust::Notification::new()
            .summary(&title)
            .body(&message)
            .show()
        {
            Ok(_) => tracing::info!(%title, "desktop notification sent"),
            Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "desktop_tests.rs"]
mod tests;
