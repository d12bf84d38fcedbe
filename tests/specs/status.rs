use crate::prelude::Project;

#[test]
fn reports_no_daemon_and_zero_tasks_on_a_fresh_base_dir() {
    let project = Project::new();

    project.cli().args(&["status"]).passes().stdout_has("daemon running: false");
}

#[test]
fn json_output_carries_the_same_counters() {
    let project = Project::new();

    let run = project.cli().args(&["-o", "json", "status"]).passes();
    let value = run.json();
    assert_eq!(value["daemon_running"], false);
    assert_eq!(value["active"], 0);
}
