// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task configuration types shared by the Probe and Cron executors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::TaskId;

/// Which kind of task a `task_id` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    Probe,
    Cron,
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskMode::Probe => write!(f, "probe"),
            TaskMode::Cron => write!(f, "cron"),
        }
    }
}

impl std::str::FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "probe" => Ok(TaskMode::Probe),
            "cron" => Ok(TaskMode::Cron),
            other => Err(format!("unrecognized task mode: {other}")),
        }
    }
}

/// Lifecycle status of a task, mirrored between the `status` file and
/// `config.json`'s `state.status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Paused,
    Stopped,
    Stuck,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Active => write!(f, "active"),
            TaskStatus::Paused => write!(f, "paused"),
            TaskStatus::Stopped => write!(f, "stopped"),
            TaskStatus::Stuck => write!(f, "stuck"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(TaskStatus::Active),
            "paused" => Ok(TaskStatus::Paused),
            "stopped" => Ok(TaskStatus::Stopped),
            "stuck" => Ok(TaskStatus::Stuck),
            other => Err(format!("unrecognized task status: {other}")),
        }
    }
}

/// Probe/Cron check scheduling. `cron_expression` is only meaningful for
/// Cron tasks; when absent the Cron job also falls back to a fixed
/// interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_check_interval_minutes")]
    pub check_interval_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<String>,
}

fn default_check_interval_minutes() -> u32 {
    5
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval_minutes(),
            next_check: None,
            cron_expression: None,
            timezone: None,
            next_run: None,
        }
    }
}

/// Probe-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub initial_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub stdout_log: String,
    #[serde(default)]
    pub stderr_log: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionConfig {
    #[serde(default = "default_max_auto_corrections")]
    pub max_auto_corrections: u32,
    #[serde(default)]
    pub current_count: u32,
    #[serde(default = "default_escalate_after_failures")]
    pub escalate_after_failures: u32,
}

fn default_max_auto_corrections() -> u32 {
    3
}

fn default_escalate_after_failures() -> u32 {
    2
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            max_auto_corrections: default_max_auto_corrections(),
            current_count: 0,
            escalate_after_failures: default_escalate_after_failures(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaConfig {
    #[serde(default = "default_success_indicators")]
    pub success_indicators: Vec<String>,
    #[serde(default = "default_failure_indicators")]
    pub failure_indicators: Vec<String>,
    #[serde(default = "default_completion_keywords")]
    pub completion_keywords: Vec<String>,
}

fn default_success_indicators() -> Vec<String> {
    vec!["任务完成".to_string(), "测试通过".to_string()]
}

fn default_failure_indicators() -> Vec<String> {
    vec!["错误".to_string(), "失败".to_string(), "Error".to_string()]
}

fn default_completion_keywords() -> Vec<String> {
    vec!["任务完成".to_string()]
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            success_indicators: default_success_indicators(),
            failure_indicators: default_failure_indicators(),
            completion_keywords: default_completion_keywords(),
        }
    }
}

impl CriteriaConfig {
    /// Criteria assigned to a freshly started Probe task. Richer than
    /// [`CriteriaConfig::default`] (which only backs a missing or
    /// partially-populated `criteria` object on load): a new session
    /// should also recognize an English `"Exception"` and the
    /// already-completed phrasing `"已完成"`, not just the generic
    /// fallback set.
    pub fn for_new_probe() -> Self {
        Self {
            success_indicators: default_success_indicators(),
            failure_indicators: vec![
                "错误".to_string(),
                "失败".to_string(),
                "Error".to_string(),
                "Exception".to_string(),
            ],
            completion_keywords: vec!["任务完成".to_string(), "已完成".to_string()],
        }
    }
}

/// Common `state` object embedded in every `config.json`: carries the
/// status mirrored from the `status` file, plus the Probe-only transcript
/// offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transcript_offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
}

impl TaskState {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            last_transcript_offset: None,
            last_check: None,
        }
    }
}

/// Cron-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<String>,
    #[serde(default)]
    pub run_count: u64,
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

fn default_timeout_minutes() -> u32 {
    10
}

fn default_max_consecutive_failures() -> u32 {
    3
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: default_timeout_minutes(),
            last_run: None,
            last_result: None,
            run_count: 0,
            consecutive_failures: 0,
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CronRuntimeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_duration_ms: Option<i64>,
    #[serde(default)]
    pub run_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Which Cron statuses trigger a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRules {
    #[serde(default = "default_notify_on_status")]
    pub notify_on_status: Vec<String>,
    #[serde(default = "default_suspicious_status")]
    pub suspicious_status: Vec<String>,
    #[serde(default = "default_true")]
    pub enable_claude_analysis: bool,
    #[serde(default)]
    pub notify_on_success: bool,
}

fn default_notify_on_status() -> Vec<String> {
    vec!["error".to_string()]
}

fn default_suspicious_status() -> Vec<String> {
    vec!["warning".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for NotificationRules {
    fn default() -> Self {
        Self {
            notify_on_status: default_notify_on_status(),
            suspicious_status: default_suspicious_status(),
            enable_claude_analysis: true,
            notify_on_success: false,
        }
    }
}

/// Per-mode payload embedded in [`TaskConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeConfig {
    Probe {
        probe: ProbeSection,
        correction: CorrectionConfig,
        criteria: CriteriaConfig,
    },
    Cron {
        execution: ExecutionConfig,
        #[serde(default)]
        cron_state: CronRuntimeState,
        #[serde(default)]
        task_content: String,
        #[serde(default)]
        workflow_content: String,
        #[serde(default)]
        notification: NotificationRules,
    },
}

impl ModeConfig {
    pub fn mode(&self) -> TaskMode {
        match self {
            ModeConfig::Probe { .. } => TaskMode::Probe,
            ModeConfig::Cron { .. } => TaskMode::Cron,
        }
    }
}

/// The full on-disk `config.json` contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub task_id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_path: String,
    pub created_at: String,
    /// Mirrors the sibling `status` file; kept in sync by every status
    /// mutation.
    pub status: TaskStatus,
    pub state: TaskState,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(flatten)]
    pub mode: ModeConfig,
    /// Fields this build does not model, preserved verbatim on round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskConfig {
    pub fn task_mode(&self) -> TaskMode {
        self.mode.mode()
    }

    /// Sets both the top-level `status` and `state.status` together so
    /// the two never drift apart.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.state.status = status;
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
