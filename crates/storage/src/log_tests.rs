// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use archon_core::FakeClock;
use tempfile::tempdir;

#[test]
fn appended_line_has_expected_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("archon.log");
    let clock = FakeClock::new(1_700_000_000_000);

    append_line(&path, &clock, LogLevel::Info, "probe started").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with('['));
    assert!(contents.contains("] [INFO] probe started\n"));
}

#[test]
fn successive_appends_accumulate_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("archon.log");
    let clock = FakeClock::new(0);

    append_line(&path, &clock, LogLevel::Info, "first").unwrap();
    append_line(&path, &clock, LogLevel::Warn, "second").unwrap();
    append_line(&path, &clock, LogLevel::Error, "third").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("[INFO] first"));
    assert!(lines[1].contains("[WARN] second"));
    assert!(lines[2].contains("[ERROR] third"));
}

#[test]
fn creates_parent_directory_if_missing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("archon.log");
    let clock = FakeClock::new(0);

    append_line(&path, &clock, LogLevel::Info, "hello").unwrap();
    assert!(path.exists());
}
