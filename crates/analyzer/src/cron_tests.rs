// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn json_shaped_success_is_parsed_directly() {
    let stdout = r#"{"status":"success","summary":"ok","findings":[],"metrics":{"count":7}}"#;
    let result = analyze_cron_output(stdout);

    assert_eq!(result.status, AnalysisStatus::Success);
    assert_eq!(result.summary, "ok");
    assert_eq!(result.metrics, Some(serde_json::json!({"count": 7})));
    assert!(result.issues.is_empty());
}

#[test]
fn json_shaped_error_becomes_one_issue() {
    let stdout = r#"{"status":"error","summary":"disk full"}"#;
    let result = analyze_cron_output(stdout);

    assert_eq!(result.status, AnalysisStatus::Error);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].kind, "error");
}

#[test]
fn textual_error_is_detected_by_keyword_scan() {
    let stdout = "Traceback (most recent call last):\nException: boom";
    let result = analyze_cron_output(stdout);

    assert_eq!(result.status, AnalysisStatus::Error);
    assert_eq!(result.issues[0].kind, "keyword_error");
}

#[test]
fn textual_warning_is_detected_when_no_error_keyword_present() {
    let stdout = "Warning: disk usage is high";
    let result = analyze_cron_output(stdout);
    assert_eq!(result.status, AnalysisStatus::Warning);
}

#[test]
fn clean_textual_output_is_success_with_truncated_summary() {
    let stdout = "a".repeat(500);
    let result = analyze_cron_output(&stdout);
    assert_eq!(result.status, AnalysisStatus::Success);
    assert_eq!(result.summary.len(), 100);
}
