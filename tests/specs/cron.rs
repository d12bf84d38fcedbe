use crate::prelude::Project;

#[test]
fn create_then_execute_runs_the_fixture_cli_once() {
    let project = Project::new();
    let workdir = project.path().join("work");
    std::fs::create_dir_all(&workdir).unwrap();

    let created = project
        .cli()
        .args(&[
            "-o",
            "json",
            "cron",
            "create",
            "--name",
            "nightly",
            "--project-path",
            workdir.to_str().unwrap(),
            "--task-content",
            "run the nightly checks",
        ])
        .passes()
        .json();
    let task_id = created["task_id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "active");

    let run = project.cli().args(&["-o", "json", "cron", "execute", &task_id]).passes();
    let value = run.json();
    assert_eq!(value["outcome"], "Executed");
    assert_eq!(value["summary"], "fixture run ok");
}

#[test]
fn pause_then_resume_round_trips_through_status() {
    let project = Project::new();
    let workdir = project.path().join("work");
    std::fs::create_dir_all(&workdir).unwrap();

    let created = project
        .cli()
        .args(&[
            "-o",
            "json",
            "cron",
            "create",
            "--name",
            "nightly",
            "--project-path",
            workdir.to_str().unwrap(),
            "--task-content",
            "run the nightly checks",
        ])
        .passes()
        .json();
    let task_id = created["task_id"].as_str().unwrap().to_string();

    project.cli().args(&["cron", "pause", &task_id]).passes();
    project
        .cli()
        .args(&["tasks", "get", &task_id])
        .passes()
        .stdout_has("status:       paused");

    project.cli().args(&["cron", "resume", &task_id]).passes();
    project
        .cli()
        .args(&["tasks", "get", &task_id])
        .passes()
        .stdout_has("status:       active");
}
