// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon stuck`: runs one Stuck Detector pass on demand, the same
//! pass the daemon's background ticker runs every five minutes.

use archon_core::StuckInfo;

use crate::context::Context;
use crate::exit_code::runtime_error;
use crate::output::{emit, OutputFormat};

pub async fn run(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let found = ctx.stuck_detector().run_pass().await.map_err(runtime_error)?;

    emit(format, &found, |found: &Vec<StuckInfo>| {
        if found.is_empty() {
            println!("no stalled tasks");
            return;
        }
        for info in found {
            println!(
                "{} [{}] {} ({:.1}m): {}",
                info.task_id, info.task_mode, info.stuck_type, info.stuck_duration_minutes, info.details
            );
        }
    })
}

#[cfg(test)]
#[path = "stuck_tests.rs"]
mod tests;
