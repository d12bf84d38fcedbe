// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The advisory task lock: `<pid>:<iso8601>` written to
//! `task.lock`, serializing state-mutating executor steps for one task
//! across every process on the host.

use std::path::Path;
use std::time::Duration;

use archon_core::{is_pid_alive, Clock};
use chrono::{DateTime, Utc};

use crate::error::StoreResult;

/// Default staleness horizon: a lock older than this, or naming a
/// dead pid, may be stolen by the next acquirer.
pub const DEFAULT_STALE_HORIZON: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockPayload {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl LockPayload {
    pub fn format(&self) -> String {
        format!("{}:{}", self.pid, self.acquired_at.to_rfc3339())
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (pid_str, ts_str) = s.trim().split_once(':')?;
        let pid = pid_str.parse().ok()?;
        let acquired_at = DateTime::parse_from_rfc3339(ts_str).ok()?.with_timezone(&Utc);
        Some(Self { pid, acquired_at })
    }

    fn is_stale(&self, now: DateTime<Utc>, horizon: Duration) -> bool {
        let age = now.signed_duration_since(self.acquired_at);
        let horizon = chrono::Duration::from_std(horizon).unwrap_or(chrono::Duration::zero());
        age > horizon || !is_pid_alive(self.pid)
    }
}

/// A held task lock. Drop (or explicit [`TaskLock::release`]) removes the
/// lock file, so the lock is released on exit even if the caller forgets.
pub struct TaskLock {
    path: std::path::PathBuf,
    released: bool,
}

impl TaskLock {
    /// Attempts to acquire the lock at `path`. Returns `Ok(None)` without
    /// blocking if a live, non-stale holder already exists.
    pub fn acquire(
        path: &Path,
        clock: &dyn Clock,
        horizon: Duration,
    ) -> StoreResult<Option<TaskLock>> {
        let now = DateTime::<Utc>::from_timestamp_millis(clock.epoch_ms()).unwrap_or_else(Utc::now);

        if let Ok(existing) = std::fs::read_to_string(path) {
            if let Some(payload) = LockPayload::parse(&existing) {
                if !payload.is_stale(now, horizon) {
                    return Ok(None);
                }
                tracing::warn!(pid = payload.pid, "stealing stale task lock");
            }
        }

        let payload = LockPayload {
            pid: std::process::id(),
            acquired_at: now,
        };
        crate::atomic::atomic_write(path, payload.format().as_bytes())?;
        Ok(Some(TaskLock {
            path: path.to_path_buf(),
            released: false,
        }))
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
            self.released = true;
        }
    }
}

impl Drop for TaskLock {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
