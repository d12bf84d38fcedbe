// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental transcript reading. A Probe session's JSONL
//! transcript is read forward from a byte offset; a shrunk file is treated
//! as rotated and restarted from 0.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// One structured transcript message.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub role: String,
    pub content: String,
    pub is_error: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result of one incremental read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub records: Vec<TranscriptRecord>,
    pub offset: u64,
    pub rotated: bool,
}

/// Reads newly appended records from `path` starting at `offset`.
///
/// If the file is smaller than `offset`, it is treated as rotated: this
/// call returns an empty outcome with `offset` reset to 0 so the *next*
/// call re-reads the file from the start.
pub fn read_incremental(path: &Path, offset: u64) -> ReadOutcome {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => {
            return ReadOutcome {
                records: Vec::new(),
                offset,
                rotated: false,
            }
        }
    };

    let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);
    if file_size < offset {
        tracing::warn!(path = %path.display(), "transcript shrank below last offset, treating as rotated");
        return ReadOutcome {
            records: Vec::new(),
            offset: 0,
            rotated: true,
        };
    }

    let mut reader = BufReader::new(file);
    if reader.seek(SeekFrom::Start(offset)).is_err() {
        return ReadOutcome {
            records: Vec::new(),
            offset,
            rotated: false,
        };
    }

    let mut records = Vec::new();
    let mut current_offset = offset;
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(n) => {
                if !line.ends_with('\n') {
                    // Incomplete trailing line: don't advance past it, re-read next call.
                    break;
                }
                current_offset += n as u64;

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_record(trimmed) {
                    Some(record) => records.push(record),
                    None => tracing::warn!(line = %trimmed, "skipping malformed transcript line"),
                }
            }
            Err(_) => break,
        }
    }

    ReadOutcome {
        records,
        offset: current_offset,
        rotated: false,
    }
}

fn parse_record(line: &str) -> Option<TranscriptRecord> {
    let json: Value = serde_json::from_str(line).ok()?;

    let role = json.get("role").and_then(Value::as_str)?.to_string();
    let content = extract_content(json.get("content")?);
    let is_error = json
        .get("is_error")
        .or_else(|| json.get("isError"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let timestamp = json
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(TranscriptRecord {
        role,
        content,
        is_error,
        timestamp,
    })
}

/// `content` may be a bare string or an array of content blocks, each
/// carrying a `text` field; blocks are concatenated with newlines.
fn extract_content(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
