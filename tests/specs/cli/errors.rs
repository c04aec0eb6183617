//! CLI error handling

use crate::prelude::*;

#[test]
fn a_missing_project_config_fails() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo ok\n")
        .build();
    std::fs::remove_file(fixture.project_path().join("vexconfig.yaml")).unwrap();

    let out = fixture.vex(&["test"]);
    assert_failure(&out);
    assert!(stderr(&out).contains("vexconfig.yaml"), "{}", stderr(&out));
}

#[test]
fn an_unknown_final_step_fails() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo ok\n")
        .build();
    let out = fixture.vex(&["nonexistent"]);
    assert_failure(&out);
    assert!(stderr(&out).contains("was not found"), "{}", stderr(&out));
}

#[test]
fn an_unknown_environment_fails() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo ok\n")
        .build();
    let out = fixture.vex(&["test", "production"]);
    assert_failure(&out);
    assert!(stderr(&out).contains("not defined"), "{}", stderr(&out));
}

#[test]
fn a_project_outside_git_fails_on_versioning() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo ok\n")
        .build();
    std::fs::remove_dir_all(fixture.project_path().join(".git")).unwrap();

    let out = fixture.vex(&["test"]);
    assert_failure(&out);
}
