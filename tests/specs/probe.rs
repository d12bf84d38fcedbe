use crate::prelude::Project;

#[test]
fn create_then_stop_round_trips_through_status() {
    let project = Project::new();
    let workdir = project.path().join("work");
    std::fs::create_dir_all(&workdir).unwrap();

    let created = project
        .cli()
        .args(&[
            "-o",
            "json",
            "probe",
            "create",
            "--initial-prompt",
            "build the feature",
            "--project-path",
            workdir.to_str().unwrap(),
            "--name",
            "demo",
        ])
        .passes()
        .json();
    let task_id = created["task_id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "active");

    project
        .cli()
        .args(&["tasks", "get", &task_id])
        .passes()
        .stdout_has("status:       active");

    project.cli().args(&["probe", "stop", &task_id]).passes();

    project
        .cli()
        .args(&["tasks", "get", &task_id])
        .passes()
        .stdout_has("status:       stopped");
}

#[test]
fn check_reports_transcript_missing_before_a_session_is_discovered() {
    let project = Project::new();
    let workdir = project.path().join("work");
    std::fs::create_dir_all(&workdir).unwrap();

    let created = project
        .cli()
        .args(&[
            "-o",
            "json",
            "probe",
            "create",
            "--initial-prompt",
            "build the feature",
            "--project-path",
            workdir.to_str().unwrap(),
            "--name",
            "demo",
        ])
        .passes()
        .json();
    let task_id = created["task_id"].as_str().unwrap().to_string();

    let run = project.cli().args(&["-o", "json", "probe", "check", &task_id]).passes();
    assert_eq!(run.json()["outcome"], "TranscriptMissing");

    project.cli().args(&["probe", "stop", &task_id]).passes();
}
