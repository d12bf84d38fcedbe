// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single in-process timer wheel for every Probe and Cron task. One job
//! per task, keyed `<mode>_<task_id>`; a background tick loop advances
//! each job's next-fire time and invokes a caller-supplied callback.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use archon_core::{ModeConfig, TaskConfig, TaskId, TaskMode, TaskStatus};

/// How often the tick loop wakes up to check for due jobs.
const TICK_INTERVAL: Duration = Duration::from_secs(5);
/// A firing this far past its scheduled time is abandoned rather than run.
const MISFIRE_GRACE: Duration = Duration::from_secs(60);

/// The callback the scheduler invokes on every firing. Implementations
/// are expected to re-check the task's status before doing any work,
/// since a status change can race with a firing already in flight.
#[async_trait]
pub trait SchedulerCallback: Send + Sync + 'static {
    async fn fire(&self, task_id: TaskId, mode: TaskMode);
}

type FireFn = Arc<dyn SchedulerCallback>;

#[derive(Clone)]
enum Trigger {
    Interval(chrono::Duration),
    Cron(Arc<Schedule>, chrono_tz::Tz),
}

impl Trigger {
    fn from_schedule(config: &TaskConfig) -> Self {
        match &config.mode {
            ModeConfig::Probe { .. } => Trigger::Interval(chrono::Duration::minutes(
                config.schedule.check_interval_minutes as i64,
            )),
            ModeConfig::Cron { .. } => {
                if let Some(expr) = &config.schedule.cron_expression {
                    if let Ok(schedule) = Schedule::from_str(expr) {
                        let tz = config
                            .schedule
                            .timezone
                            .as_deref()
                            .and_then(|t| t.parse::<chrono_tz::Tz>().ok())
                            .unwrap_or(chrono_tz::UTC);
                        return Trigger::Cron(Arc::new(schedule), tz);
                    }
                    tracing::warn!(
                        task_id = %config.task_id,
                        expression = %expr,
                        "invalid cron expression, falling back to fixed interval"
                    );
                }
                Trigger::Interval(chrono::Duration::minutes(
                    config.schedule.check_interval_minutes as i64,
                ))
            }
        }
    }

    fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Trigger::Interval(interval) => after + *interval,
            Trigger::Cron(schedule, tz) => {
                let reference = after.with_timezone(tz);
                schedule
                    .after(&reference)
                    .next()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| after + chrono::Duration::minutes(5))
            }
        }
    }
}

struct JobEntry {
    task_id: TaskId,
    mode: TaskMode,
    trigger: Trigger,
    next_fire: DateTime<Utc>,
    paused: bool,
    running: Arc<AtomicBool>,
}

fn job_id(task_id: &TaskId, mode: TaskMode) -> String {
    format!("{mode}_{task_id}")
}

/// The scheduler itself. Cheaply cloneable; every clone shares the same
/// job registry and tick loop.
#[derive(Clone)]
pub struct Scheduler {
    jobs: Arc<Mutex<HashMap<String, JobEntry>>>,
    fire: FireFn,
    shutdown: Arc<Notify>,
    tick_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Scheduler {
    pub fn new(fire: Arc<dyn SchedulerCallback>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            fire,
            shutdown: Arc::new(Notify::new()),
            tick_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Registers a job for `config`, computing its first fire time relative
    /// to `now`. Idempotent: replaces any existing job with the same id.
    pub fn add(&self, config: &TaskConfig, now: DateTime<Utc>) {
        let trigger = Trigger::from_schedule(config);
        let next_fire = trigger.next_after(now);
        let id = job_id(&config.task_id, config.task_mode());
        self.jobs.lock().insert(
            id,
            JobEntry {
                task_id: config.task_id.clone(),
                mode: config.task_mode(),
                trigger,
                next_fire,
                paused: false,
                running: Arc::new(AtomicBool::new(false)),
            },
        );
    }

    /// Removes a job. A no-op if it is not registered.
    pub fn remove(&self, task_id: &TaskId, mode: TaskMode) {
        self.jobs.lock().remove(&job_id(task_id, mode));
    }

    /// Pauses a job so it stops firing without losing its registration.
    /// A no-op if the job is not registered.
    pub fn pause(&self, task_id: &TaskId, mode: TaskMode) {
        if let Some(job) = self.jobs.lock().get_mut(&job_id(task_id, mode)) {
            job.paused = true;
        }
    }

    /// Resumes a paused job, recomputing its next fire time from `now`.
    /// A no-op if the job is not registered.
    pub fn resume(&self, task_id: &TaskId, mode: TaskMode, now: DateTime<Utc>) {
        if let Some(job) = self.jobs.lock().get_mut(&job_id(task_id, mode)) {
            job.paused = false;
            job.next_fire = job.trigger.next_after(now);
        }
    }

    /// Fires a job immediately, bypassing its schedule. A no-op if the job
    /// is not registered or a firing is already in flight.
    pub fn trigger_now(&self, task_id: &TaskId, mode: TaskMode) {
        let running = {
            let jobs = self.jobs.lock();
            jobs.get(&job_id(task_id, mode)).map(|j| j.running.clone())
        };
        let Some(running) = running else {
            return;
        };
        self.spawn_firing(task_id.clone(), mode, running);
    }

    fn spawn_firing(&self, task_id: TaskId, mode: TaskMode, running: Arc<AtomicBool>) {
        if running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::info!(%task_id, %mode, "dropping firing: previous run still in flight");
            return;
        }
        let fire = self.fire.clone();
        tokio::spawn(async move {
            fire.fire(task_id, mode).await;
            running.store(false, Ordering::SeqCst);
        });
    }

    /// Loads every task whose status is `active` from `tasks` and
    /// registers a job per task. Tasks in any other status are skipped.
    pub fn restore(&self, tasks: &[TaskConfig], now: DateTime<Utc>) {
        for config in tasks {
            if config.status == TaskStatus::Active {
                self.add(config, now);
            }
        }
    }

    /// Starts the background tick loop. Calling this more than once has
    /// no additional effect.
    pub fn start(&self) {
        let mut handle = self.tick_handle.lock();
        if handle.is_some() {
            return;
        }
        let jobs = self.jobs.clone();
        let fire = self.fire.clone();
        let shutdown = self.shutdown.clone();
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tick(&jobs, &fire);
                    }
                    _ = shutdown.notified() => break,
                }
            }
        }));
    }

    /// Stops the background tick loop. Idempotent.
    pub fn stop(&self) {
        if self.tick_handle.lock().take().is_some() {
            self.shutdown.notify_waiters();
        }
    }
}

fn tick(jobs: &Arc<Mutex<HashMap<String, JobEntry>>>, fire: &FireFn) {
    let now = Utc::now();
    let due: Vec<(TaskId, TaskMode, Arc<AtomicBool>)> = {
        let mut jobs = jobs.lock();
        let mut due = Vec::new();
        for job in jobs.values_mut() {
            if job.paused || job.next_fire > now {
                continue;
            }
            let overdue = now.signed_duration_since(job.next_fire);
            job.next_fire = job.trigger.next_after(now);
            if overdue > chrono::Duration::from_std(MISFIRE_GRACE).unwrap_or_default() {
                tracing::warn!(
                    task_id = %job.task_id,
                    mode = %job.mode,
                    "abandoning firing past misfire grace"
                );
                continue;
            }
            due.push((job.task_id.clone(), job.mode, job.running.clone()));
        }
        due
    };

    for (task_id, mode, running) in due {
        if running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::info!(%task_id, %mode, "dropping firing: previous run still in flight");
            continue;
        }
        let fire = fire.clone();
        tokio::spawn(async move {
            fire.fire(task_id, mode).await;
            running.store(false, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
