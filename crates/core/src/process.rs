// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness checks for external pids, shared by the task lock (stale-lock
//! detection) and the Probe executor (`probe.pid` liveness invariant).
//!
//! This workspace forbids `unsafe_code`, so liveness is checked by shelling
//! out to `kill -0` rather than calling `libc::kill` directly — the same
//! "treat it as an opaque external capability" shape the Probe executor
//! already uses for `--list-sessions`.

use std::process::{Command, Stdio};

/// Returns whether a process with the given pid is currently alive.
pub fn is_pid_alive(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
