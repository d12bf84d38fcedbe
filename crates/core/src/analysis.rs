// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value types produced by the Analyzer and Stuck Detector. These are pure
//! data; the algorithms that produce them live in `archon-analyzer` and
//! `archon-engine`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification assigned by the Analyzer to a Probe check or a
/// Cron run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Running,
    Idle,
    Stuck,
    Error,
    Completed,
    Warning,
    Success,
    Unknown,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnalysisStatus::Running => "running",
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Stuck => "stuck",
            AnalysisStatus::Error => "error",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Warning => "warning",
            AnalysisStatus::Success => "success",
            AnalysisStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A problem surfaced during analysis: a tool error, a failure-indicator
/// match, or a keyword hit in raw CLI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: String,
    pub detail: String,
}

impl Issue {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}

/// A positive signal surfaced during analysis (a success-indicator match).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: String,
    pub detail: String,
}

impl Finding {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}

/// Result of one Analyzer invocation, for either a Probe check or a Cron
/// run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    pub summary: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
}

impl AnalysisResult {
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Kind of stall the Stuck Detector can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckType {
    ProbeNoOutput,
    ArchonCheckTimeout,
    CronExecutionTimeout,
}

impl std::fmt::Display for StuckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StuckType::ProbeNoOutput => "probe_no_output",
            StuckType::ArchonCheckTimeout => "archon_check_timeout",
            StuckType::CronExecutionTimeout => "cron_execution_timeout",
        };
        write!(f, "{s}")
    }
}

/// One stall report from a Stuck Detector pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StuckInfo {
    pub task_id: crate::id::TaskId,
    pub task_mode: crate::task::TaskMode,
    pub stuck_type: StuckType,
    pub stuck_duration_minutes: f64,
    pub details: String,
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;
