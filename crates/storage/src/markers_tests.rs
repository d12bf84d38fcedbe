// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use archon_core::FakeClock;
use tempfile::tempdir;

#[test]
fn set_then_read_age_is_zero_at_same_instant() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".check_start");
    let clock = FakeClock::new(1_700_000_000_000);

    set_check_start(&path, &clock).unwrap();
    let age = check_start_age_secs(&path, &clock).unwrap();
    assert!(age < 0.001);
}

#[test]
fn age_grows_as_clock_advances() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".check_start");
    let clock = FakeClock::new(0);

    set_check_start(&path, &clock).unwrap();
    clock.advance_secs(400);

    let age = check_start_age_secs(&path, &clock).unwrap();
    assert!((age - 400.0).abs() < 0.001);
}

#[test]
fn missing_marker_has_no_age() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".check_start");
    let clock = FakeClock::new(0);
    assert!(check_start_age_secs(&path, &clock).is_none());
}

#[test]
fn clear_removes_the_marker_and_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".check_start");
    let clock = FakeClock::new(0);

    set_check_start(&path, &clock).unwrap();
    assert!(path.exists());

    clear_check_start(&path).unwrap();
    assert!(!path.exists());

    clear_check_start(&path).unwrap();
}
