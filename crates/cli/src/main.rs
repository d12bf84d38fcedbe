// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archon`: the control-surface CLI. Every subcommand acts directly
//! on the on-disk state store — there is no daemon round-trip, mutating
//! or not. `archond` (the long-running supervisor) and `archon` (this
//! binary) read and write the exact same task directories.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod context;
mod exit_code;
mod output;

use clap::{Parser, Subcommand};

use commands::{cron, probe, tasks};
use context::Context;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "archon", version, about = "Archon task supervisor control CLI")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon running flag, task counts, registered jobs
    Status,
    /// Query and inspect tasks
    Tasks(tasks::TasksArgs),
    /// Manage Probe tasks
    Probe(probe::ProbeArgs),
    /// Manage Cron tasks
    Cron(cron::CronArgs),
    /// Run one Stuck Detector pass
    Stuck,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(exit_code::code_of(&err));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load()?;
    match cli.command {
        Commands::Status => commands::status::run(&ctx, cli.output),
        Commands::Tasks(args) => tasks::handle(args.command, &ctx, cli.output).await,
        Commands::Probe(args) => probe::handle(args.command, &ctx, cli.output).await,
        Commands::Cron(args) => cron::handle(args.command, &ctx, cli.output).await,
        Commands::Stuck => commands::stuck::run(&ctx, cli.output).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
