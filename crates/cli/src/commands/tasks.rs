// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon tasks list|get|logs`: read-only queries over the state
//! store. None of these touch the task lock — a concurrent `probe
//! check` or `cron execute` never blocks a listing.

use clap::{Args, Subcommand};

use archon_core::{TaskConfig, TaskId, TaskMode, TaskStatus};

use crate::context::Context;
use crate::output::{emit, OutputFormat};

#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Subcommand)]
pub enum TasksCommand {
    /// List tasks, optionally filtered by mode and/or status
    List {
        #[arg(long)]
        mode: Option<TaskMode>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show the full config for one task
    Get {
        task_id: String,
    },
    /// Tail a task's archon.log
    Logs {
        task_id: String,
        #[arg(long, default_value_t = 50)]
        lines: usize,
    },
}

pub async fn handle(command: TasksCommand, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        TasksCommand::List { mode, status } => list(ctx, mode, status, format),
        TasksCommand::Get { task_id } => get(ctx, &TaskId::new(task_id), format),
        TasksCommand::Logs { task_id, lines } => logs(ctx, &TaskId::new(task_id), lines),
    }
}

fn list(ctx: &Context, mode: Option<TaskMode>, status: Option<TaskStatus>, format: OutputFormat) -> anyhow::Result<()> {
    let mut tasks = ctx.store.list_tasks().map_err(crate::exit_code::store_error)?;
    if let Some(mode) = mode {
        tasks.retain(|t| t.task_mode() == mode);
    }
    if let Some(status) = status {
        tasks.retain(|t| t.status == status);
    }

    emit(format, &tasks, |tasks| {
        if tasks.is_empty() {
            println!("no tasks");
            return;
        }
        println!("{:<38} {:<6} {:<8} NAME", "TASK ID", "MODE", "STATUS");
        for task in tasks {
            println!(
                "{:<38} {:<6} {:<8} {}",
                task.task_id, task.task_mode(), task.status, task.name
            );
        }
    })
}

fn get(ctx: &Context, task_id: &TaskId, format: OutputFormat) -> anyhow::Result<()> {
    let config = ctx.store.read_config(task_id).map_err(crate::exit_code::store_error)?;
    emit(format, &config, print_config)
}

fn print_config(config: &TaskConfig) {
    println!("task_id:      {}", config.task_id);
    println!("name:         {}", config.name);
    println!("mode:         {}", config.task_mode());
    println!("status:       {}", config.status);
    println!("project_path: {}", config.project_path);
    println!("created_at:   {}", config.created_at);
    if let Some(last_check) = &config.state.last_check {
        println!("last_check:   {last_check}");
    }
}

/// Tails `lines` from the end of `<task_id>/archon.log`. The log is
/// small enough in practice (one task, append-only) that reading it
/// whole and slicing is simpler than a streaming reverse reader.
fn logs(ctx: &Context, task_id: &TaskId, lines: usize) -> anyhow::Result<()> {
    // Touch the config first so an unknown task id fails the same way
    // every other `tasks`/`probe`/`cron` subcommand does.
    ctx.store.read_config(task_id).map_err(crate::exit_code::store_error)?;

    let path = ctx.store.task_paths(task_id).archon_log();
    let contents = std::fs::read_to_string(&path).unwrap_or_default();
    let all_lines: Vec<&str> = contents.lines().collect();
    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
