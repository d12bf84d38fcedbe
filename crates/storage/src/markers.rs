// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `.check_start` marker: fractional seconds since epoch,
//! written at the start of an executor `check`/`execute` call and cleared
//! on exit. A marker left behind past `archon_check_timeout` signals a
//! hung check to the Stuck Detector.

use std::path::Path;

use archon_core::Clock;

use crate::atomic::atomic_write;
use crate::error::{StoreError, StoreResult};

/// Writes the marker as the clock's current fractional-seconds timestamp.
pub fn set_check_start(path: &Path, clock: &dyn Clock) -> StoreResult<()> {
    atomic_write(path, clock.epoch_secs_f64().to_string().as_bytes())
}

/// Removes the marker. Absence is not an error (it may already be cleared).
pub fn clear_check_start(path: &Path) -> StoreResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path.display().to_string(), e)),
    }
}

/// Age of the marker in seconds, or `None` if it does not exist or is
/// unparseable.
pub fn check_start_age_secs(path: &Path, clock: &dyn Clock) -> Option<f64> {
    let contents = std::fs::read_to_string(path).ok()?;
    let started_at: f64 = contents.trim().parse().ok()?;
    Some((clock.epoch_secs_f64() - started_at).max(0.0))
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
