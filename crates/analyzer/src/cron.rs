// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron output analysis: a JSON-shaped fast path, falling back to
//! case-insensitive keyword scanning for plain-text CLI output.

use archon_core::{AnalysisResult, AnalysisStatus, Finding, Issue};
use serde::Deserialize;
use serde_json::Value;

use crate::keywords::{contains_any_ci, ERROR_KEYWORDS, WARNING_KEYWORDS};

#[derive(Debug, Deserialize)]
struct CronJsonShape {
    status: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    findings: Vec<String>,
    #[serde(default)]
    metrics: Option<Value>,
}

/// Analyzes one Cron run's raw CLI stdout.
pub fn analyze_cron_output(stdout: &str) -> AnalysisResult {
    if let Ok(shape) = serde_json::from_str::<CronJsonShape>(stdout.trim()) {
        let status = match shape.status.as_str() {
            "error" => AnalysisStatus::Error,
            "warning" => AnalysisStatus::Warning,
            _ => AnalysisStatus::Success,
        };
        let issues = match status {
            AnalysisStatus::Error => vec![Issue::new("error", shape.summary.clone())],
            AnalysisStatus::Warning => vec![Issue::new("warning", shape.summary.clone())],
            _ => Vec::new(),
        };
        return AnalysisResult {
            status,
            summary: shape.summary,
            issues,
            findings: shape
                .findings
                .into_iter()
                .map(|f| Finding::new("reported", f))
                .collect(),
            metrics: shape.metrics,
            progress: None,
            last_activity: None,
        };
    }

    if contains_any_ci(stdout, ERROR_KEYWORDS) {
        return AnalysisResult {
            status: AnalysisStatus::Error,
            summary: truncate(stdout, 200),
            issues: vec![Issue::new("keyword_error", truncate(stdout, 200))],
            findings: Vec::new(),
            metrics: None,
            progress: None,
            last_activity: None,
        };
    }

    if contains_any_ci(stdout, WARNING_KEYWORDS) {
        return AnalysisResult {
            status: AnalysisStatus::Warning,
            summary: truncate(stdout, 200),
            issues: vec![Issue::new("keyword_warning", truncate(stdout, 200))],
            findings: Vec::new(),
            metrics: None,
            progress: None,
            last_activity: None,
        };
    }

    AnalysisResult {
        status: AnalysisStatus::Success,
        summary: truncate(stdout, 100),
        issues: Vec::new(),
        findings: Vec::new(),
        metrics: None,
        progress: None,
        last_activity: None,
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
