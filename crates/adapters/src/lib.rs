// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the supervised CLI process and
//! the fire-and-forget notification sink.

pub mod cli;
pub mod notify;

pub use cli::{
    CliAdapter, CliError, CronExec, CronOutput, ProbeHandle, ProbeResume, ProbeSpawn,
    RealCliAdapter,
};
pub use notify::{NotifyAdapter, NotifyError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use cli::{CliCall, FakeCliAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
