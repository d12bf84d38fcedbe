// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed, defaulted global configuration loaded once at daemon startup
//! (`<base>/settings.json`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_webhook: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_method() -> String {
    "system".to_string()
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            method: default_method(),
            webhook_url: None,
            slack_webhook: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultSettings {
    #[serde(default = "default_probe_interval")]
    pub probe_check_interval_minutes: u32,
    #[serde(default = "default_cron_interval")]
    pub cron_check_interval_minutes: u32,
    #[serde(default = "default_max_corrections")]
    pub max_auto_corrections: u32,
}

fn default_probe_interval() -> u32 {
    5
}

fn default_cron_interval() -> u32 {
    60
}

fn default_max_corrections() -> u32 {
    3
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            probe_check_interval_minutes: default_probe_interval(),
            cron_check_interval_minutes: default_cron_interval(),
            max_auto_corrections: default_max_corrections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_cli_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

fn default_cli_path() -> String {
    "claude".to_string()
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            path: default_cli_path(),
            default_model: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_max_log_size_mb")]
    pub max_log_size_mb: u64,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_size_mb() -> u64 {
    10
}

fn default_max_log_files() -> u32 {
    5
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_log_size_mb: default_max_log_size_mb(),
            max_log_files: default_max_log_files(),
        }
    }
}

/// Root of `settings.json`. Every field has a default so a partially
/// hand-edited or absent file still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub defaults: DefaultSettings,
    #[serde(default)]
    pub cli: CliSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
