// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon status`: whether a daemon holds the single-instance lock,
//! plus a count of on-disk tasks by status. There is no in-process
//! handle to a running daemon's scheduler, so "registered jobs" is
//! approximated as the number of tasks whose on-disk status is `active`
//! — the set the scheduler would have restored on its last startup.

use serde::Serialize;

use archon_core::TaskStatus;

use crate::context::Context;
use crate::output::{emit, OutputFormat};

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub daemon_running: bool,
    pub active: usize,
    pub paused: usize,
    pub stopped: usize,
    pub stuck: usize,
    pub registered_jobs: usize,
}

pub fn run(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let tasks = ctx.store.list_tasks().map_err(crate::exit_code::store_error)?;
    let active = tasks.iter().filter(|t| t.status == TaskStatus::Active).count();
    let summary = StatusSummary {
        daemon_running: ctx.daemon_running(),
        active,
        paused: tasks.iter().filter(|t| t.status == TaskStatus::Paused).count(),
        stopped: tasks.iter().filter(|t| t.status == TaskStatus::Stopped).count(),
        stuck: tasks.iter().filter(|t| t.status == TaskStatus::Stuck).count(),
        registered_jobs: active,
    };

    emit(format, &summary, |s| {
        println!("daemon running: {}", s.daemon_running);
        println!(
            "tasks: {} active, {} paused, {} stopped, {} stuck",
            s.active, s.paused, s.stopped, s.stuck
        );
        println!("registered jobs: {}", s.registered_jobs);
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
