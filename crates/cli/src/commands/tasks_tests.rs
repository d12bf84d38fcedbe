// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use archon_adapters::{FakeCliAdapter, FakeNotifyAdapter};
use archon_core::{FakeClock, GlobalSettings, TaskId, TaskMode, TaskStatus};
use archon_engine::Runtime;
use archon_storage::{BasePaths, LogLevel, TaskStore};
use tempfile::tempdir;

use super::*;

fn context(dir: &tempfile::TempDir) -> Context {
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));
    let runtime = Runtime::new(
        store.clone(),
        Arc::new(FakeCliAdapter::new()),
        Arc::new(FakeNotifyAdapter::new()),
        GlobalSettings::default(),
    );
    Context { store, runtime }
}

fn probe_config(task_id: &TaskId) -> archon_core::TaskConfig {
    archon_core::TaskConfig {
        task_id: task_id.clone(),
        name: "watcher".to_string(),
        description: String::new(),
        project_path: "/tmp/project".to_string(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        status: TaskStatus::Active,
        state: archon_core::TaskState::new(TaskStatus::Active),
        schedule: archon_core::ScheduleConfig::default(),
        mode: archon_core::ModeConfig::Probe {
            probe: archon_core::ProbeSection {
                pid: None,
                session_id: task_id.to_string(),
                initial_prompt: "watch the build".to_string(),
                transcript_path: None,
                stdout_log: String::new(),
                stderr_log: String::new(),
            },
            correction: archon_core::CorrectionConfig::default(),
            criteria: archon_core::CriteriaConfig::default(),
        },
        extra: serde_json::Map::new(),
    }
}

#[test]
fn list_filters_by_mode_and_status() {
    let dir = tempdir().unwrap();
    let ctx = context(&dir);
    let id = TaskId::new("t1");
    ctx.store.create_task_dir(&id).unwrap();
    ctx.store.write_config(&probe_config(&id)).unwrap();

    list(&ctx, Some(TaskMode::Probe), None, OutputFormat::Text).unwrap();
    list(&ctx, Some(TaskMode::Cron), None, OutputFormat::Text).unwrap();
    list(&ctx, None, Some(TaskStatus::Active), OutputFormat::Json).unwrap();
}

#[test]
fn get_reports_store_error_for_unknown_task() {
    let dir = tempdir().unwrap();
    let ctx = context(&dir);
    let err = get(&ctx, &TaskId::new("missing"), OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn get_prints_the_persisted_config() {
    let dir = tempdir().unwrap();
    let ctx = context(&dir);
    let id = TaskId::new("t1");
    ctx.store.create_task_dir(&id).unwrap();
    ctx.store.write_config(&probe_config(&id)).unwrap();

    get(&ctx, &id, OutputFormat::Json).unwrap();
}

#[test]
fn logs_tails_the_requested_number_of_lines() {
    let dir = tempdir().unwrap();
    let ctx = context(&dir);
    let id = TaskId::new("t1");
    ctx.store.create_task_dir(&id).unwrap();
    ctx.store.write_config(&probe_config(&id)).unwrap();
    for i in 0..5 {
        ctx.store.log(&id, LogLevel::Info, &format!("line {i}")).unwrap();
    }

    logs(&ctx, &id, 2).unwrap();
}

#[test]
fn logs_fails_for_an_unknown_task() {
    let dir = tempdir().unwrap();
    let ctx = context(&dir);
    assert!(logs(&ctx, &TaskId::new("missing"), 10).is_err());
}
