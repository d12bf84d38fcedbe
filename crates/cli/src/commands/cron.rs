// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon cron create|execute|stop|pause|resume`: drives the Cron
//! task lifecycle synchronously from the command line.

use clap::{Args, Subcommand};

use archon_core::{AnalysisResult, TaskConfig, TaskId};
use archon_engine::CronExecOutcome;

use crate::context::Context;
use crate::exit_code::runtime_error;
use crate::output::{emit, OutputFormat};

#[derive(Args)]
pub struct CronArgs {
    #[command(subcommand)]
    pub command: CronCommand,
}

#[derive(Subcommand)]
pub enum CronCommand {
    /// Create a new Cron task
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        project_path: String,
        /// Contents written to task.md
        #[arg(long)]
        task_content: String,
        /// Contents written to workflow/workflow.md
        #[arg(long, default_value = "")]
        workflow_content: String,
        /// Five-field cron expression; falls back to a fixed interval if absent
        #[arg(long)]
        cron_expression: Option<String>,
        #[arg(long, default_value_t = 60)]
        check_interval_minutes: u32,
        #[arg(long, default_value_t = 10)]
        timeout_minutes: u32,
    },
    /// Synchronously run the task once
    Execute { task_id: String },
    /// Stop a Cron task
    Stop { task_id: String },
    /// Pause a Cron task (scheduled firings stop)
    Pause { task_id: String },
    /// Resume a paused Cron task
    Resume { task_id: String },
}

pub async fn handle(command: CronCommand, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        CronCommand::Create {
            name,
            description,
            project_path,
            task_content,
            workflow_content,
            cron_expression,
            check_interval_minutes,
            timeout_minutes,
        } => {
            create(
                ctx,
                name,
                description,
                project_path,
                task_content,
                workflow_content,
                cron_expression,
                check_interval_minutes,
                timeout_minutes,
                format,
            )
            .await
        }
        CronCommand::Execute { task_id } => execute(ctx, &TaskId::new(task_id), format).await,
        CronCommand::Stop { task_id } => stop(ctx, &TaskId::new(task_id)).await,
        CronCommand::Pause { task_id } => pause(ctx, &TaskId::new(task_id)).await,
        CronCommand::Resume { task_id } => resume(ctx, &TaskId::new(task_id)).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn create(
    ctx: &Context,
    name: String,
    description: String,
    project_path: String,
    task_content: String,
    workflow_content: String,
    cron_expression: Option<String>,
    check_interval_minutes: u32,
    timeout_minutes: u32,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let executor = ctx.cron_executor();
    let config = executor
        .create(
            name,
            description,
            project_path,
            task_content,
            workflow_content,
            cron_expression,
            check_interval_minutes,
            timeout_minutes,
        )
        .await
        .map_err(runtime_error)?;

    emit(format, &config, |c: &TaskConfig| {
        println!("created cron task {} ({})", c.task_id, c.name);
    })
}

async fn execute(ctx: &Context, task_id: &TaskId, format: OutputFormat) -> anyhow::Result<()> {
    let executor = ctx.cron_executor();
    let outcome = executor.execute(task_id).await.map_err(runtime_error)?;

    if let CronExecOutcome::Executed(result) = &outcome {
        executor.handle(task_id, result).await.map_err(runtime_error)?;
    }

    emit(format, &ExecReport::from(&outcome), |r| {
        println!("{}: {}", task_id, r.label());
    })
}

/// Serializable projection of [`CronExecOutcome`] for `--output json`.
#[derive(serde::Serialize)]
#[serde(tag = "outcome")]
enum ExecReport {
    Locked,
    Timeout,
    Executed(AnalysisResult),
}

impl ExecReport {
    fn label(&self) -> String {
        match self {
            ExecReport::Locked => "locked".to_string(),
            ExecReport::Timeout => "timeout".to_string(),
            ExecReport::Executed(result) => result.status.to_string(),
        }
    }
}

impl From<&CronExecOutcome> for ExecReport {
    fn from(outcome: &CronExecOutcome) -> Self {
        match outcome {
            CronExecOutcome::Locked => ExecReport::Locked,
            CronExecOutcome::Timeout => ExecReport::Timeout,
            CronExecOutcome::Executed(result) => ExecReport::Executed(result.clone()),
        }
    }
}

async fn stop(ctx: &Context, task_id: &TaskId) -> anyhow::Result<()> {
    ctx.cron_executor().stop(task_id).await.map_err(runtime_error)?;
    println!("{task_id}: stopped");
    Ok(())
}

async fn pause(ctx: &Context, task_id: &TaskId) -> anyhow::Result<()> {
    ctx.cron_executor().pause(task_id).await.map_err(runtime_error)?;
    println!("{task_id}: paused");
    Ok(())
}

async fn resume(ctx: &Context, task_id: &TaskId) -> anyhow::Result<()> {
    ctx.cron_executor().resume(task_id).await.map_err(runtime_error)?;
    println!("{task_id}: active");
    Ok(())
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
