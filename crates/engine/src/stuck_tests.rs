// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use archon_adapters::{FakeCliAdapter, FakeNotifyAdapter};
use archon_core::{FakeClock, GlobalSettings, ModeConfig, StuckType, TaskId, TaskStatus};
use archon_storage::{BasePaths, TaskStore};
use tempfile::tempdir;

use super::*;

fn detector(dir: &tempfile::TempDir, clock: Arc<FakeClock>, notify: FakeNotifyAdapter) -> (StuckDetector, TaskStore) {
    let store = TaskStore::new(BasePaths::new(dir.path()), clock);
    let runtime = Runtime::new(
        store.clone(),
        Arc::new(FakeCliAdapter::new()),
        Arc::new(notify),
        GlobalSettings::default(),
    );
    (StuckDetector::new(runtime), store)
}

fn probe_config(task_id: &TaskId, transcript_path: Option<String>) -> archon_core::TaskConfig {
    archon_core::TaskConfig {
        task_id: task_id.clone(),
        name: "watch".to_string(),
        description: String::new(),
        project_path: "/tmp/project".to_string(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        status: TaskStatus::Active,
        state: archon_core::TaskState::new(TaskStatus::Active),
        schedule: archon_core::ScheduleConfig::default(),
        mode: ModeConfig::Probe {
            probe: archon_core::ProbeSection {
                pid: Some(std::process::id()),
                session_id: task_id.to_string(),
                initial_prompt: "watch the build".to_string(),
                transcript_path,
                stdout_log: String::new(),
                stderr_log: String::new(),
            },
            correction: archon_core::CorrectionConfig::default(),
            criteria: archon_core::CriteriaConfig::default(),
        },
        extra: serde_json::Map::new(),
    }
}

fn cron_config(task_id: &TaskId, last_run: Option<String>, timeout_minutes: u32) -> archon_core::TaskConfig {
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
                timeout_minutes,
                last_run,
                ..Default::default()
            },
            cron_state: archon_core::CronRuntimeState::default(),
            task_content: "do the nightly thing".to_string(),
            workflow_content: "1. run checks".to_string(),
            notification: archon_core::NotificationRules::default(),
        },
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn run_pass_finds_nothing_for_a_freshly_created_task() {
    let dir = tempdir().unwrap();
    let (det, store) = detector(&dir, Arc::new(FakeClock::new(1_700_000_000_000)), FakeNotifyAdapter::new());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&probe_config(&task_id, None)).unwrap();

    let found = det.run_pass().await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn run_pass_skips_non_active_tasks() {
    let dir = tempdir().unwrap();
    let (det, store) = detector(&dir, Arc::new(FakeClock::new(1_700_000_000_000)), FakeNotifyAdapter::new());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    let mut config = probe_config(&task_id, None);
    config.set_status(TaskStatus::Paused);
    store.write_config(&config).unwrap();
    store.set_check_start(&task_id).unwrap();

    let found = det.run_pass().await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn stale_check_start_marker_is_flagged_and_cleared() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(FakeClock::new(1_700_000_000_000));
    let notify = FakeNotifyAdapter::new();
    let (det, store) = detector(&dir, clock.clone(), notify.clone());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&probe_config(&task_id, None)).unwrap();
    store.set_check_start(&task_id).unwrap();

    // Push the clock past the 5 minute archon-check timeout.
    clock.set_ms(1_700_000_000_000 + 6 * 60 * 1000);

    let found = det.run_pass().await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].stuck_type, StuckType::ArchonCheckTimeout);
    assert!(store.check_start_age_secs(&task_id).is_none());
    assert_eq!(notify.calls().len(), 1);
}

#[tokio::test]
async fn probe_with_a_stale_transcript_is_marked_stuck() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(FakeClock::new(1_700_000_000_000));
    let notify = FakeNotifyAdapter::new();
    let (det, store) = detector(&dir, clock.clone(), notify.clone());

    let task_id = TaskId::new("t1");
    let paths = store.create_task_dir(&task_id).unwrap();
    let transcript = paths.dir.join("transcript.jsonl");
    std::fs::write(&transcript, "{}\n").unwrap();
    // Back-date the transcript's mtime well past the 60 minute idle window.
    let stale_time = std::time::SystemTime::now() - std::time::Duration::from_secs(2 * 60 * 60);
    let file = std::fs::File::open(&transcript).unwrap();
    file.set_modified(stale_time).unwrap();

    store
        .write_config(&probe_config(&task_id, Some(transcript.display().to_string())))
        .unwrap();

    let found = det.run_pass().await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].stuck_type, StuckType::ProbeNoOutput);
    let reloaded = store.read_config(&task_id).unwrap();
    assert_eq!(reloaded.status, TaskStatus::Stuck);
    assert_eq!(notify.calls().len(), 1);
}

#[tokio::test]
async fn probe_without_a_resolved_transcript_is_not_flagged() {
    let dir = tempdir().unwrap();
    let (det, store) = detector(&dir, Arc::new(FakeClock::new(1_700_000_000_000)), FakeNotifyAdapter::new());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    store.write_config(&probe_config(&task_id, None)).unwrap();

    let found = det.run_pass().await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn cron_run_past_its_timeout_without_a_result_is_flagged() {
    let dir = tempdir().unwrap();
    let (det, store) = detector(&dir, Arc::new(FakeClock::new(1_700_000_000_000)), FakeNotifyAdapter::new());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    let stale_run = (chrono::Utc::now() - chrono::Duration::minutes(10)).to_rfc3339();
    store.write_config(&cron_config(&task_id, Some(stale_run), 1)).unwrap();

    let found = det.run_pass().await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].stuck_type, StuckType::CronExecutionTimeout);
    let reloaded = store.read_config(&task_id).unwrap();
    let ModeConfig::Cron { execution, .. } = &reloaded.mode else {
        panic!("expected cron mode");
    };
    assert_eq!(execution.consecutive_failures, 1);
    assert_eq!(execution.last_result.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn cron_run_already_completed_is_not_flagged() {
    let dir = tempdir().unwrap();
    let (det, store) = detector(&dir, Arc::new(FakeClock::new(1_700_000_000_000)), FakeNotifyAdapter::new());

    let task_id = TaskId::new("t1");
    store.create_task_dir(&task_id).unwrap();
    let mut config = cron_config(&task_id, Some(chrono::Utc::now().to_rfc3339()), 1);
    if let ModeConfig::Cron { execution, .. } = &mut config.mode {
        execution.last_result = Some("success".to_string());
    }
    store.write_config(&config).unwrap();

    let found = det.run_pass().await.unwrap();
    assert!(found.is_empty());
}
