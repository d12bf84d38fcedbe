// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Probe transcript analysis. Pure function of the transcript
//! records and the task's criteria; window sizes are fixed constants
//! because they determine reaction latency versus noise and must stay
//! reproducible across runs.

use archon_core::{AnalysisResult, AnalysisStatus, CriteriaConfig, Finding, Issue};
use chrono::{DateTime, Utc};

use crate::transcript::TranscriptRecord;

/// Records scanned for issues/findings.
const ISSUE_WINDOW: usize = 10;
/// Records scanned for a completion keyword.
const COMPLETION_WINDOW: usize = 5;
/// Idle threshold past which a task is classified `stuck`.
const STUCK_IDLE_MINUTES: i64 = 60;
/// Idle threshold past which a task is classified `idle`.
const IDLE_IDLE_MINUTES: i64 = 15;

/// Analyzes a Probe transcript against `criteria` as of `now`.
pub fn analyze_probe(
    records: &[TranscriptRecord],
    criteria: &CriteriaConfig,
    now: DateTime<Utc>,
) -> AnalysisResult {
    let idle_minutes = records
        .last()
        .and_then(|r| r.timestamp)
        .map(|ts| now.signed_duration_since(ts).num_minutes())
        .unwrap_or(0);

    let issue_window = tail(records, ISSUE_WINDOW);
    let mut issues = Vec::new();
    let mut findings = Vec::new();
    let mut matched_success_indicators = std::collections::HashSet::new();

    for record in issue_window {
        if record.role == "tool_result" && record.is_error {
            issues.push(Issue::new("tool_error", record.content.clone()));
        }
        for indicator in &criteria.failure_indicators {
            if contains_ci(&record.content, indicator) {
                issues.push(Issue::new("failure_indicator", indicator.clone()));
            }
        }
        for indicator in &criteria.success_indicators {
            if contains_ci(&record.content, indicator) {
                findings.push(Finding::new("success_indicator", indicator.clone()));
                matched_success_indicators.insert(indicator.clone());
            }
        }
    }

    let mut status = if !issues.is_empty() {
        AnalysisStatus::Error
    } else if idle_minutes > STUCK_IDLE_MINUTES {
        AnalysisStatus::Stuck
    } else if idle_minutes > IDLE_IDLE_MINUTES {
        AnalysisStatus::Idle
    } else {
        AnalysisStatus::Running
    };

    let completion_window = tail(records, COMPLETION_WINDOW);
    let completed = completion_window.iter().any(|record| {
        criteria
            .completion_keywords
            .iter()
            .any(|keyword| record.content.contains(keyword.as_str()))
    });
    if completed {
        status = AnalysisStatus::Completed;
    }

    let progress = if !criteria.success_indicators.is_empty()
        && matched_success_indicators.len() >= criteria.success_indicators.len()
    {
        100
    } else {
        ((records.len() as f64 / 50.0) * 100.0).floor().min(90.0) as u32
    };

    let summary = format!("{status} ({} issues, idle {idle_minutes}m)", issues.len());
    let last_activity = records.last().and_then(|r| r.timestamp).map(|ts| ts.to_rfc3339());

    AnalysisResult {
        status,
        summary,
        issues,
        findings,
        metrics: None,
        progress: Some(progress),
        last_activity,
    }
}

fn tail(records: &[TranscriptRecord], n: usize) -> &[TranscriptRecord] {
    let start = records.len().saturating_sub(n);
    &records[start..]
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
