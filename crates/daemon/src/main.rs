// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `archond`: the supervisor process. Loads configuration, acquires the
//! single-instance lock, restores every active task into the scheduler,
//! and runs until a termination signal arrives.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use archon_adapters::RealCliAdapter;
use archon_core::UuidIdGen;
use archon_daemon::{notify_factory, Config, DaemonLock, Fire, PidFileError};
use archon_engine::{CronExecutor, ProbeExecutor, Runtime, Scheduler, StuckDetector};
use archon_storage::TaskStore;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// How often the stuck detector scans every active task.
const STUCK_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("archond {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("archond {}", env!("CARGO_PKG_VERSION"));
                println!("Archon daemon - supervises Probe and Cron tasks");
                println!();
                println!("USAGE:");
                println!("    archond");
                println!();
                println!("The daemon is typically started by the `archon` CLI and should");
                println!("not be invoked directly. It has no control socket; the CLI acts");
                println!("on the same on-disk state directly.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: archond [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    rotate_log_if_needed(&config.log_path, &config.settings.logging);
    let _log_guard = setup_logging(&config)?;

    let lock = match DaemonLock::acquire(&config.pid_path) {
        Ok(lock) => lock,
        Err(PidFileError::AlreadyRunning(path)) => {
            eprintln!("archond is already running (lock held on {})", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!("failed to acquire pid lock: {e}");
            return Err(e.into());
        }
    };

    info!("starting archond, base_dir={}", config.base.base.display());

    let store = TaskStore::new(config.base.clone(), Arc::new(archon_core::SystemClock));
    let cli = Arc::new(RealCliAdapter::new(config.settings.cli.path.clone()));
    let notifier = notify_factory::build(&config.settings);
    let runtime = Runtime::new(store.clone(), cli, notifier, config.settings.clone());
    let id_gen = Arc::new(UuidIdGen);

    let probe = Arc::new(ProbeExecutor::new(runtime.clone(), id_gen.clone()));
    let cron = Arc::new(CronExecutor::new(runtime.clone(), id_gen));
    let stuck_detector = StuckDetector::new(runtime.clone());

    let fire = Arc::new(Fire::new(store.clone(), probe, cron));
    let scheduler = Scheduler::new(fire);

    let tasks = store.list_tasks()?;
    scheduler.restore(&tasks, store.now());
    scheduler.start();
    info!("scheduler restored {} active task(s)", tasks.iter().filter(|t| t.status == archon_core::TaskStatus::Active).count());

    let stuck_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STUCK_CHECK_INTERVAL);
        ticker.tick().await; // first tick fires immediately; skip it, pass has nothing to find yet
        loop {
            ticker.tick().await;
            if let Err(e) = stuck_detector.run_pass().await {
                error!("stuck detector pass failed: {e}");
            }
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    println!("READY");
    info!("archond ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    stuck_handle.abort();
    scheduler.stop();
    drop(lock);
    info!("archond stopped");
    Ok(())
}

/// Rotates `log_path` if it exceeds `settings.max_log_size_mb`, shifting
/// `archon.log` → `archon.log.1` → `archon.log.2` → ... and dropping
/// whatever falls past `settings.max_log_files`. Best-effort: failures
/// are ignored so the daemon still starts on a read-only or missing log
/// directory.
fn rotate_log_if_needed(log_path: &std::path::Path, settings: &archon_core::LoggingSettings) {
    let max_bytes = settings.max_log_size_mb * 1024 * 1024;
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < max_bytes {
        return;
    }

    let log_str = log_path.display().to_string();
    let keep = settings.max_log_files.max(1);
    for i in (1..keep).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(&config.log_dir, &config.log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // ARCHON_LOG takes precedence over RUST_LOG; both fall back to the
    // `logging.level` setting, then "info".
    let directive = std::env::var("ARCHON_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| config.settings.logging.level.clone());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
