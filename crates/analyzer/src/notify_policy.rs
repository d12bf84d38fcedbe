// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Cron notify decision: whether one analysis result should
//! produce an outbound notification, given the task's [`NotificationRules`].

use archon_core::{AnalysisStatus, NotificationRules};

/// Whether `status` should trigger a notification under `rules`.
pub fn should_notify(status: AnalysisStatus, rules: &NotificationRules) -> bool {
    let status_str = status.to_string();

    if rules.notify_on_status.iter().any(|s| s == &status_str) {
        return true;
    }
    if rules.enable_claude_analysis && rules.suspicious_status.iter().any(|s| s == &status_str) {
        return true;
    }
    if status == AnalysisStatus::Success && rules.notify_on_success {
        return true;
    }
    false
}

#[cfg(test)]
#[path = "notify_policy_tests.rs"]
mod tests;
