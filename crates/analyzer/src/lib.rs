// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Pure analysis of Probe transcripts and Cron output. Nothing in
//! this crate touches disk or spawns a process: the executors feed it
//! records and strings, and it hands back an [`archon_core::AnalysisResult`].

pub mod cron;
pub mod keywords;
pub mod notify_policy;
pub mod probe;
pub mod transcript;

pub use cron::analyze_cron_output;
pub use notify_policy::should_notify;
pub use probe::analyze_probe;
pub use transcript::{read_incremental, ReadOutcome, TranscriptRecord};
