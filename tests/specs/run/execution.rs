//! Plan execution through the CLI

use crate::prelude::*;

#[test]
fn runs_the_step_prefix_in_order() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo unit tests passed\n")
        .step("02-supply", "- name: provision\n  cmd: echo provisioned\n")
        .step("03-deploy", "- name: rollout\n  cmd: echo rolled out\n")
        .build();

    let out = fixture.vex(&["supply", "stag"]);
    assert_success(&out);

    let text = stdout(&out);
    assert!(text.contains("Executing step test"));
    assert!(text.contains("Executing step supply"));
    // the plan stops at the requested final step
    assert!(!text.contains("Executing step deploy"));
    let test_pos = text.find("Executing step test").unwrap();
    let supply_pos = text.find("Executing step supply").unwrap();
    assert!(test_pos < supply_pos);
}

#[test]
fn prints_the_plan_banner_with_version_and_environment() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: echo ok\n")
        .build();
    let out = fixture.vex(&["test", "stag"]);
    assert_success(&out);
    let text = stdout(&out);
    assert!(text.contains("Environment: stag"));
    // one feat commit on a tagless history
    assert!(text.contains("Version: v0.1.0"));
}

#[test]
fn template_variables_are_interpolated_into_commands() {
    let fixture = fixture()
        .step("01-supply", "- name: provision\n  cmd: echo replicas=${var.replicas}\n")
        .variables("stag", "supply", "- name: replicas\n  value: 3\n")
        .build();

    let out = fixture.vex(&["supply", "stag"]);
    assert_success(&out);
    assert!(stdout(&out).contains("replicas=3"), "{}", stdout(&out));
}

#[test]
fn runtime_variables_are_available_to_commands() {
    let fixture = fixture()
        .step(
            "01-test",
            "- name: who\n  cmd: echo app=${var.project_name} env=${var.environment}\n",
        )
        .build();

    let out = fixture.vex(&["test", "dev"]);
    assert_success(&out);
    assert!(stdout(&out).contains("app=specapp env=dev"));
}

#[test]
fn a_failing_command_fails_the_run_with_logs() {
    let fixture = fixture()
        .step("01-test", "- name: unit\n  cmd: 'echo 1 test failed; exit 2'\n")
        .build();

    let out = fixture.vex(&["test"]);
    assert_failure(&out);
    assert!(stdout(&out).contains("--- Failure logs ---"));
    assert!(stdout(&out).contains("1 test failed"));
    assert!(stderr(&out).contains("exit code 2"), "{}", stderr(&out));
}

#[test]
fn a_variable_cycle_fails_naming_the_variables() {
    let fixture = fixture()
        .step("01-supply", "- name: provision\n  cmd: echo ok\n")
        .variables(
            "stag",
            "supply",
            "- name: a\n  value: ${var.b}\n- name: b\n  value: ${var.a}\n",
        )
        .build();

    let out = fixture.vex(&["supply", "stag"]);
    assert_failure(&out);
    let err = stderr(&out);
    assert!(err.contains('a') && err.contains('b'), "{err}");
    assert!(err.contains("circular") || err.contains("missing"), "{err}");
}

#[test]
fn a_missed_probe_fails_the_command() {
    let fixture = fixture()
        .step(
            "01-deploy",
            concat!(
                "- name: rollout\n",
                "  cmd: echo deployment queued\n",
                "  outputs:\n",
                "    - probe: 'deployment complete'\n",
            ),
        )
        .build();

    let out = fixture.vex(&["deploy"]);
    assert_failure(&out);
    assert!(stderr(&out).contains("probe"), "{}", stderr(&out));
}

#[test]
fn extracted_outputs_flow_into_later_commands_of_the_step() {
    let fixture = fixture()
        .step(
            "01-supply",
            concat!(
                "- name: provision\n",
                "  cmd: 'echo url: myapp.example.com'\n",
                "  outputs:\n",
                "    - name: url\n",
                "      probe: 'url:\\s*(\\S+)'\n",
                "- name: verify\n",
                "  cmd: test \"${var.url}\" = \"myapp.example.com\"\n",
            ),
        )
        .build();

    let out = fixture.vex(&["supply", "stag"]);
    assert_success(&out);
}

#[test]
fn template_files_are_interpolated_before_the_command_runs() {
    let fixture = fixture()
        .step(
            "01-deploy",
            concat!(
                "- name: apply\n",
                "  cmd: cat app.conf\n",
                "  workdir: conf\n",
                "  template_files:\n",
                "    - app.conf\n",
            ),
        )
        .step_file("01-deploy/conf/app.conf", "environment=${var.environment}\n")
        .build();

    let out = fixture.vex(&["deploy", "stag"]);
    assert_success(&out);
    assert!(stdout(&out).contains("environment=stag"), "{}", stdout(&out));
}
