use crate::prelude::Project;

#[test]
fn one_pass_over_an_empty_store_finds_nothing() {
    let project = Project::new();

    project.cli().args(&["stuck"]).passes().stdout_has("no stalled tasks");
}
