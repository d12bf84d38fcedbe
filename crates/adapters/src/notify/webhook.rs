// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic and Slack-shaped webhook notification backends (
//! `method ∈ {webhook, slack}`). Both POST a JSON payload with a 10-second
//! timeout, differing only in payload shape — the wire format itself is
//! out of scope, so the Slack variant is a thin `text` wrapper over
//! the same POST machinery.

use std::time::Duration;

use async_trait::async_trait;

use super::{NotifyAdapter, NotifyError};

/// HTTP timeout for every outbound notification POST.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Which payload shape to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `{"title": ..., "message": ...}`
    Generic,
    /// `{"text": "<title>: <message>"}`, the shape Slack's incoming
    /// webhooks expect.
    Slack,
}

/// POSTs a JSON notification payload to a configured URL.
#[derive(Clone)]
pub struct WebhookNotifyAdapter {
    url: String,
    shape: Shape,
    client: reqwest::Client,
}

impl WebhookNotifyAdapter {
    pub fn generic(url: impl Into<String>) -> Self {
        Self::new(url, Shape::Generic)
    }

    pub fn slack(url: impl Into<String>) -> Self {
        Self::new(url, Shape::Slack)
    }

    fn new(url: impl Into<String>, shape: Shape) -> Self {
        Self {
            url: url.into(),
            shape,
            client: reqwest::Client::new(),
        }
    }

    fn payload(&self, title: &str, message: &str) -> serde_json::Value {
        match self.shape {
            Shape::Generic => serde_json::json!({ "title": title, "message": message }),
            Shape::Slack => serde_json::json!({ "text": format!("{title}: {message}") }),
        }
    }
}

#[async_trait]
impl NotifyAdapter for WebhookNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let body = self.payload(title, message);
        match self
            .client
            .post(&self.url)
            .json(&body)
            .timeout(NOTIFY_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %self.url, "webhook notification sent");
                Ok(())
            }
            Ok(response) => {
                tracing::warn!(url = %self.url, status = %response.status(), "webhook notification rejected");
                Err(NotifyError::SendFailed(format!("status {}", response.status())))
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "webhook notification failed");
                Err(NotifyError::SendFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
