// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `archond`: wires the Archon core (scheduler, executors, stuck
//! detector) into a long-running process — config load, structured
//! logging, a single-instance pid file, signal handling, and graceful
//! shutdown. The control surface itself (HTTP) is out of scope; this
//! process only runs the timer wheel and the stuck-detector ticker.

pub mod config;
pub mod fire;
pub mod notify_factory;
pub mod pidfile;

pub use config::{Config, ConfigError};
pub use fire::Fire;
pub use pidfile::{DaemonLock, PidFileError};
