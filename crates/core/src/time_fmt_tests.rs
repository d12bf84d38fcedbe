// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn formats_seconds_only() {
    assert_eq!(format_elapsed(45), "45s");
}

#[test]
fn formats_minutes_and_seconds() {
    assert_eq!(format_elapsed(90), "1m 30s");
}

#[test]
fn formats_hours_minutes_seconds() {
    assert_eq!(format_elapsed(3725), "1h 2m 5s");
}

#[test]
fn formats_elapsed_ms() {
    assert_eq!(format_elapsed_ms(90_000), "1m 30s");
}
