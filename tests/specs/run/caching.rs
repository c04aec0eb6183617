//! Incremental execution across runs

use crate::prelude::*;

fn two_step_fixture() -> Fixture {
    fixture()
        .step("01-supply", "- name: provision\n  cmd: echo provisioned\n")
        .step("02-deploy", "- name: rollout\n  cmd: echo rolled out\n")
        .build()
}

#[test]
fn an_unchanged_second_deploy_run_skips_every_step() {
    let fixture = two_step_fixture();
    assert_success(&fixture.vex(&["deploy", "stag"]));

    let out = fixture.vex(&["deploy", "stag"]);
    assert_success(&out);
    let text = stdout(&out);
    assert!(text.contains("Step 'supply' already ran"), "{text}");
    assert!(text.contains("Step 'deploy' already ran"), "{text}");
    assert!(!text.contains("rolled out"));
}

#[test]
fn state_tables_are_persisted_per_step() {
    let fixture = two_step_fixture();
    assert_success(&fixture.vex(&["deploy", "stag"]));

    let state = fixture.workspace_path().join("state");
    assert!(state.join("supply.tb").exists());
    assert!(state.join("deploy.tb").exists());
}

#[test]
fn a_code_change_reruns_deploy_but_not_supply() {
    let fixture = two_step_fixture();
    assert_success(&fixture.vex(&["deploy", "stag"]));

    fixture.change_project_code();

    let out = fixture.vex(&["deploy", "stag"]);
    assert_success(&out);
    let text = stdout(&out);
    assert!(text.contains("Step 'supply' already ran"), "{text}");
    assert!(text.contains("rolled out"), "{text}");
}

#[test]
fn an_environment_switch_reruns_supply() {
    let fixture = two_step_fixture();
    assert_success(&fixture.vex(&["supply", "stag"]));

    let out = fixture.vex(&["supply", "dev"]);
    assert_success(&out);
    assert!(stdout(&out).contains("provisioned"));
}

#[test]
fn deploy_runs_tag_the_project_commit() {
    let fixture = two_step_fixture();
    assert_success(&fixture.vex(&["deploy", "stag"]));

    let tags = std::process::Command::new("git")
        .args(["tag", "--list"])
        .current_dir(fixture.project_path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&tags.stdout).contains("v0.1.0"));
}

#[test]
fn shared_outputs_persist_under_the_shared_scope() {
    let fixture = fixture()
        .step(
            "01-supply",
            concat!(
                "- name: terraform\n",
                "  cmd: 'echo url: myapp.example.com'\n",
                "  workdir: shared\n",
                "  outputs:\n",
                "    - name: url\n",
                "      probe: 'url:\\s*(\\S+)'\n",
            ),
        )
        .step_file("01-supply/shared/placeholder.txt", "keep\n")
        .build();

    assert_success(&fixture.vex(&["supply", "stag"]));

    let vars = fixture.workspace_path().join("vars");
    assert!(vars.join("shared/supply").exists());
    assert!(!vars.join("stag/supply").exists());
}

#[test]
fn shared_vars_survive_skipped_steps_for_later_ones() {
    let fixture = fixture()
        .step(
            "01-supply",
            concat!(
                "- name: terraform\n",
                "  cmd: 'echo url: myapp.example.com'\n",
                "  workdir: shared\n",
                "  outputs:\n",
                "    - name: url\n",
                "      probe: 'url:\\s*(\\S+)'\n",
            ),
        )
        .step_file("01-supply/shared/placeholder.txt", "keep\n")
        .step(
            "02-deploy",
            "- name: verify\n  cmd: test \"${var.url}\" = \"myapp.example.com\"\n",
        )
        .build();

    // first run records supply's shared output
    assert_success(&fixture.vex(&["supply", "stag"]));
    // second run skips supply yet deploy still resolves ${var.url}
    let out = fixture.vex(&["deploy", "stag"]);
    assert_success(&out);
    assert!(stdout(&out).contains("Step 'supply' already ran"));
}

#[test]
fn workspaces_are_materialized_per_scope() {
    let fixture = fixture()
        .step("01-deploy", "- name: rollout\n  cmd: echo ok\n")
        .step_file("01-deploy/manifests/app.yaml", "kind: Deployment\n")
        .step_file("01-deploy/shared/common.yaml", "kind: Namespace\n")
        .build();

    assert_success(&fixture.vex(&["deploy", "stag"]));

    let workdir = fixture.workspace_path().join("workdir");
    assert!(workdir.join("stag/deploy/manifests/app.yaml").exists());
    assert!(!workdir.join("stag/deploy/shared/common.yaml").exists());
    assert!(workdir.join("shared/deploy/shared/common.yaml").exists());
    assert!(!workdir.join("shared/deploy/manifests/app.yaml").exists());
}
