// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt templates the executors hand to the external CLI: the Probe
//! correction-injection template and the Cron run prompt.

use archon_core::Issue;

/// Truncation applied to each issue bullet in a correction prompt.
const ISSUE_BULLET_CHARS: usize = 200;

/// Builds the correction prompt injected via `--resume` when a Probe
/// check classifies `error`. Each issue is rendered as a bullet of
/// at most [`ISSUE_BULLET_CHARS`] characters.
pub fn correction_prompt(issues: &[Issue]) -> String {
    let mut bullets = String::new();
    for issue in issues {
        let detail: String = issue.detail.chars().take(ISSUE_BULLET_CHARS).collect();
        bullets.push_str(&format!("- [{}] {detail}\n", issue.kind));
    }

    format!(
        "The previous attempt encountered the following issues:\n\n{bullets}\n\
         Please diagnose the root cause of these issues and resume progress \
         toward the original goal described in destination.md."
    )
}

/// Builds the one-shot Cron run prompt: `task.md` content, a
/// separator, `workflow.md` content, then a fixed instruction asking for
/// a JSON object matching the Analyzer's JSON-shaped fast path.
pub fn cron_prompt(task_content: &str, workflow_content: &str) -> String {
    format!(
        "{task_content}\n\n---\n\n{workflow_content}\n\n---\n\n\
         When you are done, respond with a single JSON object of the shape \
         {{\"status\": <\"success\"|\"warning\"|\"error\">, \"summary\": <string>, \
         \"findings\": [<string>], \"metrics\": {{...}}}} describing the outcome \
         of this run."
    )
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;
