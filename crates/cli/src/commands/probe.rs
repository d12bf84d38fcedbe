// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon probe create|check|stop`: drives the Probe task lifecycle
//! synchronously from the command line, exactly as the daemon's
//! scheduler would drive it on a firing.

use clap::{Args, Subcommand};

use archon_core::{AnalysisResult, TaskConfig, TaskId};
use archon_engine::ProbeCheckOutcome;

use crate::context::Context;
use crate::exit_code::runtime_error;
use crate::output::{emit, OutputFormat};

#[derive(Args)]
pub struct ProbeArgs {
    #[command(subcommand)]
    pub command: ProbeCommand,
}

#[derive(Subcommand)]
pub enum ProbeCommand {
    /// Start a new Probe session
    Create {
        /// The goal handed to the CLI as its initial prompt
        #[arg(long)]
        initial_prompt: String,
        #[arg(long)]
        project_path: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 5)]
        check_interval_minutes: u32,
        #[arg(long, default_value_t = 3)]
        max_auto_corrections: u32,
    },
    /// Synchronously perform one check
    Check { task_id: String },
    /// Stop a Probe session
    Stop {
        task_id: String,
        /// Send SIGKILL immediately instead of waiting for a graceful exit
        #[arg(long)]
        force: bool,
        #[arg(long, default_value_t = 10)]
        timeout_seconds: u64,
    },
}

pub async fn handle(command: ProbeCommand, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ProbeCommand::Create {
            initial_prompt,
            project_path,
            name,
            description,
            check_interval_minutes,
            max_auto_corrections,
        } => {
            create(
                ctx,
                initial_prompt,
                project_path,
                name,
                description,
                check_interval_minutes,
                max_auto_corrections,
                format,
            )
            .await
        }
        ProbeCommand::Check { task_id } => check(ctx, &TaskId::new(task_id), format).await,
        ProbeCommand::Stop {
            task_id,
            force,
            timeout_seconds,
        } => stop(ctx, &TaskId::new(task_id), !force, timeout_seconds).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn create(
    ctx: &Context,
    initial_prompt: String,
    project_path: String,
    name: String,
    description: String,
    check_interval_minutes: u32,
    max_auto_corrections: u32,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let executor = ctx.probe_executor();
    let config = executor
        .start(
            initial_prompt,
            project_path,
            name,
            description,
            check_interval_minutes,
            max_auto_corrections,
        )
        .await
        .map_err(runtime_error)?;

    emit(format, &config, |c: &TaskConfig| {
        println!("created probe task {} ({})", c.task_id, c.name);
    })
}

async fn check(ctx: &Context, task_id: &TaskId, format: OutputFormat) -> anyhow::Result<()> {
    let executor = ctx.probe_executor();
    let outcome = executor.check(task_id).await.map_err(runtime_error)?;

    if let ProbeCheckOutcome::Analyzed(result) = &outcome {
        executor.handle(task_id, result).await.map_err(runtime_error)?;
    }

    emit(format, &CheckReport::from(&outcome), |r| {
        println!("{}: {}", task_id, r.label());
    })
}

/// Serializable projection of [`ProbeCheckOutcome`] for `--output json`.
#[derive(serde::Serialize)]
#[serde(tag = "outcome")]
enum CheckReport {
    Locked,
    Stopped,
    TranscriptMissing,
    Analyzed(AnalysisResult),
}

impl CheckReport {
    fn label(&self) -> String {
        match self {
            CheckReport::Locked => "locked".to_string(),
            CheckReport::Stopped => "stopped".to_string(),
            CheckReport::TranscriptMissing => "transcript not found yet".to_string(),
            CheckReport::Analyzed(result) => result.status.to_string(),
        }
    }
}

impl From<&ProbeCheckOutcome> for CheckReport {
    fn from(outcome: &ProbeCheckOutcome) -> Self {
        match outcome {
            ProbeCheckOutcome::Locked => CheckReport::Locked,
            ProbeCheckOutcome::Stopped => CheckReport::Stopped,
            ProbeCheckOutcome::TranscriptMissing => CheckReport::TranscriptMissing,
            ProbeCheckOutcome::Analyzed(result) => CheckReport::Analyzed(result.clone()),
        }
    }
}

async fn stop(ctx: &Context, task_id: &TaskId, graceful: bool, timeout_seconds: u64) -> anyhow::Result<()> {
    ctx.probe_executor()
        .stop(task_id, graceful, timeout_seconds)
        .await
        .map_err(runtime_error)?;
    println!("{task_id}: stopped");
    Ok(())
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
