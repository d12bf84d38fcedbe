// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corrections.md`: a summary table plus a detail block, entries
//! auto-numbered and append-only. The whole file is re-rendered on every
//! append so the table and the detail block never drift apart.

use std::path::Path;

use archon_core::Clock;
use chrono::{DateTime, Utc};

use crate::atomic::atomic_write;
use crate::error::StoreResult;

/// One injected-correction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionEntry {
    pub number: u32,
    pub timestamp: DateTime<Utc>,
    pub issues: Vec<String>,
}

const HEADER: &str = "# Corrections\n\n| # | Timestamp | Issues |\n|---|---|---|\n";
const DETAILS_HEADER: &str = "\n## Details\n";

/// Renders the full `corrections.md` contents for `entries`, in order.
pub fn render(entries: &[CorrectionEntry]) -> String {
    let mut out = String::from(HEADER);
    for entry in entries {
        let issues_cell = entry.issues.join("; ").replace('|', "\\|");
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.number,
            entry.timestamp.to_rfc3339(),
            issues_cell
        ));
    }

    out.push_str(DETAILS_HEADER);
    for entry in entries {
        out.push_str(&format!(
            "\n### Correction {} \u{2014} {}\n\n",
            entry.number,
            entry.timestamp.to_rfc3339()
        ));
        for issue in &entry.issues {
            out.push_str(&format!("- {issue}\n"));
        }
    }
    out
}

/// Parses a previously rendered `corrections.md` back into its ordered
/// entry list, reading only the detail block (the summary table is
/// derived, never authoritative).
pub fn parse(contents: &str) -> Vec<CorrectionEntry> {
    let mut entries = Vec::new();
    let mut lines = contents.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix("### Correction ") else {
            continue;
        };
        let Some((number_str, timestamp_str)) = rest.split_once(" \u{2014} ") else {
            continue;
        };
        let Ok(number) = number_str.trim().parse() else {
            continue;
        };
        let Ok(timestamp) = DateTime::parse_from_rfc3339(timestamp_str.trim()) else {
            continue;
        };

        let mut issues = Vec::new();
        while let Some(next) = lines.peek() {
            if let Some(issue) = next.strip_prefix("- ") {
                issues.push(issue.to_string());
                lines.next();
            } else if next.trim().is_empty() {
                lines.next();
            } else {
                break;
            }
        }

        entries.push(CorrectionEntry {
            number,
            timestamp: timestamp.with_timezone(&Utc),
            issues,
        });
    }

    entries
}

/// Appends a new correction record to `path`, auto-numbering it one past
/// the highest existing entry, and returns the newly written entry.
pub fn append(path: &Path, clock: &dyn Clock, issues: Vec<String>) -> StoreResult<CorrectionEntry> {
    let mut entries = match std::fs::read_to_string(path) {
        Ok(contents) => parse(&contents),
        Err(_) => Vec::new(),
    };

    let number = entries.last().map(|e| e.number + 1).unwrap_or(1);
    let timestamp =
        DateTime::<Utc>::from_timestamp_millis(clock.epoch_ms()).unwrap_or_else(Utc::now);
    let entry = CorrectionEntry {
        number,
        timestamp,
        issues,
    };
    entries.push(entry.clone());

    atomic_write(path, render(&entries).as_bytes())?;
    Ok(entry)
}

#[cfg(test)]
#[path = "corrections_tests.rs"]
mod tests;
