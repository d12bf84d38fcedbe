use crate::prelude::Project;

#[test]
fn list_reports_no_tasks_on_an_empty_store() {
    let project = Project::new();

    project.cli().args(&["tasks", "list"]).passes().stdout_has("no tasks");
}

#[test]
fn get_fails_for_an_unknown_task_id() {
    let project = Project::new();

    let run = project.cli().args(&["tasks", "get", "does-not-exist"]).fails();
    assert_eq!(run.code(), Some(2));
}

#[test]
fn logs_fails_for_an_unknown_task_id() {
    let project = Project::new();

    project.cli().args(&["tasks", "logs", "does-not-exist"]).fails();
}
