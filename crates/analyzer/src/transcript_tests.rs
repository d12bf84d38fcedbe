// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn reads_complete_lines_and_advances_offset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transcript.jsonl");
    std::fs::write(
        &path,
        "{\"role\":\"assistant\",\"content\":\"hello\",\"timestamp\":\"2026-01-01T00:00:00Z\"}\n",
    )
    .unwrap();

    let outcome = read_incremental(&path, 0);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].role, "assistant");
    assert_eq!(outcome.records[0].content, "hello");
    assert!(!outcome.rotated);
    assert_eq!(outcome.offset, std::fs::metadata(&path).unwrap().len());
}

#[test]
fn incomplete_trailing_line_does_not_advance_past_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transcript.jsonl");
    std::fs::write(&path, "{\"role\":\"user\",\"content\":\"partial").unwrap();

    let outcome = read_incremental(&path, 0);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.offset, 0);
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transcript.jsonl");
    std::fs::write(
        &path,
        "not json at all\n{\"role\":\"assistant\",\"content\":\"ok\"}\n",
    )
    .unwrap();

    let outcome = read_incremental(&path, 0);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].content, "ok");
}

#[test]
fn shrunk_file_is_treated_as_rotated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transcript.jsonl");
    std::fs::write(&path, "{\"role\":\"user\",\"content\":\"x\"}\n").unwrap();

    let outcome = read_incremental(&path, 10_000);
    assert!(outcome.rotated);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.offset, 0);
}

#[test]
fn content_array_of_blocks_is_joined() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transcript.jsonl");
    std::fs::write(
        &path,
        "{\"role\":\"assistant\",\"content\":[{\"text\":\"a\"},{\"text\":\"b\"}]}\n",
    )
    .unwrap();

    let outcome = read_incremental(&path, 0);
    assert_eq!(outcome.records[0].content, "a\nb");
}
