// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use archon_adapters::{CliCall, CliError, CronOutput, FakeCliAdapter, FakeNotifyAdapter};
use archon_core::{FakeClock, GlobalSettings, SequentialIdGen, TaskId};
use archon_storage::{BasePaths, TaskStore};
use tempfile::tempdir;

use super::*;

fn executor(dir: &tempfile::TempDir, cli: FakeCliAdapter, notify: FakeNotifyAdapter) -> CronExecutor {
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(1_700_000_000_000)));
    let runtime = Runtime::new(store, Arc::new(cli), Arc::new(notify), GlobalSettings::default());
    CronExecutor::new(runtime, Arc::new(SequentialIdGen::new("cron")))
}

fn cron_config(task_id: &TaskId, max_consecutive_failures: u32, consecutive_failures: u32) -> archon_core::TaskConfig {
    archon_core::TaskConfig {
        task_id: task_id.clone(),
        name: "nightly".to_string(),
        description: String::new(),
        project_path: "/tmp/project".to_string(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        status: TaskStatus::Active,
        state: archon_core::TaskState::new(TaskStatus::Active),
        schedule: archon_core::ScheduleConfig::default(),
        mode: ModeConfig::Cron {
            execution: archon_core::ExecutionConfig {
                timeout_minutes: 1,
                consecutive_failures,
                max_consecutive_failures,
                ..Default::default()
            },
            cron_state: archon_core::CronRuntimeState::default(),
            task_content: "do the nightly thing".to_string(),
            workflow_content: "1. run checks\n2. report".to_string(),
            notification: archon_core::NotificationRules::default(),
        },
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn create_persists_task_and_writes_markdown() {
    let dir = tempdir().unwrap();
    let exec = executor(&dir, FakeCliAdapter::new(), FakeNotifyAdapter::new());

    let config = exec
        .create(
            "nightly".to_string(),
            "desc".to_string(),
            "/tmp/project".to_string(),
            "task body".to_string(),
            "workflow body".to_string(),
            None,
            60,
            10,
        )
        .await
        .unwrap();

    assert_eq!(config.status, TaskStatus::Active);
    let task_md = std::fs::read_to_string(dir.path().join(config.task_id.as_str()).join("task.md")).unwrap();
    assert_eq!(task_md, "task body");
    let workflow_md = std::fs::read_to_string(
        dir.path()
            .join(config.task_id.as_str())
            .join("workflow")
            .join("workflow.md"),
    )
    .unwrap();
    assert_eq!(workflow_md, "workflow body");
}

#[tokio::test]
async fn execute_classifies_json_success_and_resets_failures() {
    let dir = tempdir().unwrap();
    let cli = FakeCliAdapter::new();
    cli.set_cron_output(CronOutput {
        stdout: r#"{"status":"success","summary":"ok","findings":[],"metrics":{"count":7}}"#.to_string(),
        stderr: String::new(),
        exit_code: Some(0),
        duration_ms: 42,
    });
    let exec = executor(&dir, cli.clone(), FakeNotifyAdapter::new());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 2)).unwrap();

    let outcome = exec.execute(&task_id).await.unwrap();
    let CronExecOutcome::Executed(result) = outcome else {
        panic!("expected Executed outcome");
    };
    assert_eq!(result.status, AnalysisStatus::Success);
    assert_eq!(result.summary, "ok");

    let reloaded = store.read_config(&task_id).unwrap();
    let ModeConfig::Cron {
        execution,
        cron_state,
        ..
    } = &reloaded.mode
    else {
        panic!("expected cron mode");
    };
    assert_eq!(execution.consecutive_failures, 0);
    assert_eq!(execution.last_result.as_deref(), Some("success"));
    assert_eq!(execution.run_count, 1);
    assert_eq!(cron_state.run_count, 1);
    assert!(matches!(cli.calls().last(), Some(CliCall::ExecuteCron { .. })));
}

#[tokio::test]
async fn execute_classifies_textual_error_and_increments_failures() {
    let dir = tempdir().unwrap();
    let cli = FakeCliAdapter::new();
    cli.set_cron_output(CronOutput {
        stdout: "Traceback (most recent call last)\nException: boom".to_string(),
        stderr: String::new(),
        exit_code: Some(1),
        duration_ms: 10,
    });
    let exec = executor(&dir, cli, FakeNotifyAdapter::new());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 2)).unwrap();

    let outcome = exec.execute(&task_id).await.unwrap();
    let CronExecOutcome::Executed(result) = outcome else {
        panic!("expected Executed outcome");
    };
    assert_eq!(result.status, AnalysisStatus::Error);

    let reloaded = store.read_config(&task_id).unwrap();
    let ModeConfig::Cron { execution, .. } = &reloaded.mode else {
        panic!("expected cron mode");
    };
    assert_eq!(execution.consecutive_failures, 3);
    assert_eq!(reloaded.status, TaskStatus::Active);
}

#[tokio::test]
async fn execute_timeout_auto_pauses_after_threshold() {
    let dir = tempdir().unwrap();
    let cli = FakeCliAdapter::new();
    cli.fail_cron(CliError::Timeout);
    let notify = FakeNotifyAdapter::new();
    let exec = executor(&dir, cli, notify.clone());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 2)).unwrap();

    let outcome = exec.execute(&task_id).await.unwrap();
    assert!(matches!(outcome, CronExecOutcome::Timeout));

    let reloaded = store.read_config(&task_id).unwrap();
    let ModeConfig::Cron { execution, .. } = &reloaded.mode else {
        panic!("expected cron mode");
    };
    assert_eq!(execution.consecutive_failures, 3);
    assert_eq!(execution.last_result.as_deref(), Some("timeout"));
    assert_eq!(reloaded.status, TaskStatus::Paused);
    assert_eq!(notify.calls().len(), 1);
    assert_eq!(notify.calls()[0].title, "task_error");
}

#[tokio::test]
async fn execute_returns_locked_when_lock_held() {
    let dir = tempdir().unwrap();
    let exec = executor(&dir, FakeCliAdapter::new(), FakeNotifyAdapter::new());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    let held = store.acquire_lock(&task_id).unwrap();
    assert!(held.is_some());

    let outcome = exec.execute(&task_id).await.unwrap();
    assert!(matches!(outcome, CronExecOutcome::Locked));
}

#[tokio::test]
async fn handle_notifies_on_error_by_default() {
    let dir = tempdir().unwrap();
    let notify = FakeNotifyAdapter::new();
    let exec = executor(&dir, FakeCliAdapter::new(), notify.clone());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 0)).unwrap();

    let result = AnalysisResult {
        status: AnalysisStatus::Error,
        summary: "boom".to_string(),
        issues: vec![],
        findings: vec![],
        metrics: None,
        progress: None,
        last_activity: None,
    };

    exec.handle(&task_id, &result).await.unwrap();
    assert_eq!(notify.calls().len(), 1);
    assert_eq!(notify.calls()[0].title, "task_error");
}

#[tokio::test]
async fn handle_does_not_notify_on_success_by_default() {
    let dir = tempdir().unwrap();
    let notify = FakeNotifyAdapter::new();
    let exec = executor(&dir, FakeCliAdapter::new(), notify.clone());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 0)).unwrap();

    let result = AnalysisResult {
        status: AnalysisStatus::Success,
        summary: "ok".to_string(),
        issues: vec![],
        findings: vec![],
        metrics: None,
        progress: None,
        last_activity: None,
    };

    exec.handle(&task_id, &result).await.unwrap();
    assert!(notify.calls().is_empty());
}

#[tokio::test]
async fn stop_pause_resume_transition_status() {
    let dir = tempdir().unwrap();
    let exec = executor(&dir, FakeCliAdapter::new(), FakeNotifyAdapter::new());
    let store = TaskStore::new(BasePaths::new(dir.path()), Arc::new(FakeClock::new(0)));

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&cron_config(&task_id, 3, 0)).unwrap();

    exec.pause(&task_id).await.unwrap();
    assert_eq!(store.read_config(&task_id).unwrap().status, TaskStatus::Paused);

    exec.resume(&task_id).await.unwrap();
    assert_eq!(store.read_config(&task_id).unwrap().status, TaskStatus::Active);

    exec.stop(&task_id).await.unwrap();
    assert_eq!(store.read_config(&task_id).unwrap().status, TaskStatus::Stopped);
}
