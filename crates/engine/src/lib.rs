// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Owns the Probe and Cron lifecycles, the scheduler, and the stuck
//! detector: the four components that consume `archon-analyzer` and
//! `archon-storage` to actually run tasks. The `Runtime` value (see
//! [`runtime`]) is constructed once at daemon or CLI startup and threaded
//! through every call here instead of being retrieved from a global.

pub mod cron;
pub mod error;
pub mod probe;
pub mod prompts;
pub mod runtime;
pub mod scheduler;
pub mod stuck;

pub use cron::{CronExecOutcome, CronExecutor};
pub use error::{RuntimeError, RuntimeResult};
pub use probe::{ProbeCheckOutcome, ProbeExecutor};
pub use runtime::Runtime;
pub use scheduler::{Scheduler, SchedulerCallback};
pub use stuck::StuckDetector;
