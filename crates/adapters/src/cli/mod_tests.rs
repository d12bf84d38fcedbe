use std::path::PathBuf;
use std::time::Duration;

use super::*;

/// Guards against accidental argument-shape drift in [`ProbeSpawn`] and
/// friends: the child-process contract names these fields exactly.
#[test]
fn probe_spawn_carries_the_documented_fields() {
    let spawn = ProbeSpawn {
        initial_prompt: "go".to_string(),
        project_path: PathBuf::from("/tmp"),
        session_id: "task-1".to_string(),
        stdout_log: PathBuf::from("/tmp/probe_stdout.log"),
        stderr_log: PathBuf::from("/tmp/probe_stderr.log"),
    };
    assert_eq!(spawn.session_id, "task-1");
}

#[test]
fn cli_error_messages_are_human_readable() {
    let err = CliError::SpawnFailed("no such file".to_string());
    assert_eq!(err.to_string(), "failed to spawn CLI process: no such file");
    assert_eq!(CliError::Timeout.to_string(), "CLI invocation exceeded its timeout");
}

#[test]
fn cron_exec_carries_a_timeout() {
    let exec = CronExec {
        prompt: "run".to_string(),
        project_path: PathBuf::from("/tmp"),
        timeout: Duration::from_secs(600),
    };
    assert_eq!(exec.timeout, Duration::from_secs(600));
}
