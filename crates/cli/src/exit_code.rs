// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Carries a specific process exit code through an [`anyhow::Error`]
//! chain, the way `main` distinguishes "bad input" from "I/O trouble"
//! from "another process holds the lock" without every command needing
//! its own `std::process::exit`.

use archon_engine::RuntimeError;
use archon_storage::StoreError;

pub const USER_INPUT: i32 = 2;
pub const IO_ERROR: i32 = 3;
pub const LOCKED: i32 = 4;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
}

impl std::fmt::Display for ExitError {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl std::error::Error for ExitError {}

/// Wraps `err` with an [`ExitError`] carrying `code`, preserving `err`'s
/// message as the visible context.
pub fn with_code(err: impl std::fmt::Display, code: i32) -> anyhow::Error {
    anyhow::Error::new(ExitError { code }).context(err.to_string())
}

pub fn store_error(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::NotFound(_) => with_code(err, USER_INPUT),
        StoreError::Locked => with_code(err, LOCKED),
        StoreError::Io { .. } | StoreError::MalformedConfig { .. } => with_code(err, IO_ERROR),
    }
}

pub fn runtime_error(err: RuntimeError) -> anyhow::Error {
    match err {
        RuntimeError::Locked => with_code(err, LOCKED),
        RuntimeError::ConfigMissing(_) => with_code(err, USER_INPUT),
        RuntimeError::Timeout => with_code(err, IO_ERROR),
        RuntimeError::Store(e) => store_error(e),
        RuntimeError::Spawn(e) => with_code(e, IO_ERROR),
    }
}

/// The exit code to use for an error that isn't an [`ExitError`]: any
/// unclassified failure.
pub const DEFAULT: i32 = 1;

pub fn code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ExitError>().map_or(DEFAULT, |e| e.code)
}

#[cfg(test)]
#[path = "exit_code_tests.rs"]
mod tests;
