// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::TempDir;

const ENVIRONMENTS: &str = "- value: development\n  name: dev\n- value: staging\n  name: stag\n";

fn template_with_steps(steps: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("environments.yaml"), ENVIRONMENTS).unwrap();
    for (full_name, commands) in steps {
        let step_dir = dir.path().join("steps").join(full_name);
        fs::create_dir_all(&step_dir).unwrap();
        fs::write(step_dir.join("commands.yaml"), commands).unwrap();
    }
    dir
}

fn simple_command(name: &str) -> String {
    format!("- name: {name}\n  cmd: echo {name}\n")
}

#[test]
fn builds_the_prefix_up_to_the_final_step() {
    let dir = template_with_steps(&[
        ("01-test", &simple_command("unit")),
        ("02-supply", &simple_command("infra")),
        ("03-package", &simple_command("image")),
        ("04-deploy", &simple_command("rollout")),
    ]);

    let plan = PlanBuilder::new().build(dir.path(), "package", "stag").unwrap();

    assert_eq!(plan.environment().name(), "stag");
    let names: Vec<_> = plan.steps().iter().map(|s| s.name().name()).collect();
    assert_eq!(names, vec!["test", "supply", "package"]);
}

#[test]
fn steps_are_ordered_by_their_numeric_prefix() {
    let dir = template_with_steps(&[
        ("10-deploy", &simple_command("rollout")),
        ("2-supply", &simple_command("infra")),
        ("1-test", &simple_command("unit")),
    ]);

    let plan = PlanBuilder::new().build(dir.path(), "deploy", "dev").unwrap();
    let orders: Vec<_> = plan.steps().iter().map(|s| s.name().order()).collect();
    assert_eq!(orders, vec![1, 2, 10]);
}

#[test]
fn empty_environment_selects_the_first_declared() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    let plan = PlanBuilder::new().build(dir.path(), "test", "").unwrap();
    assert_eq!(plan.environment().name(), "dev");
}

#[test]
fn unknown_environment_is_an_error() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    let err = PlanBuilder::new().build(dir.path(), "test", "prod");
    assert!(matches!(err, Err(TemplateError::UnknownEnvironment(_))));
}

#[test]
fn missing_environments_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = PlanBuilder::new().build(dir.path(), "test", "");
    assert!(matches!(err, Err(TemplateError::NoEnvironments)));
}

#[test]
fn unknown_final_step_is_an_error() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    let err = PlanBuilder::new().build(dir.path(), "deploy", "dev");
    assert!(matches!(err, Err(TemplateError::FinalStepNotFound(_))));
}

#[test]
fn final_step_is_selected_by_bare_name_not_full_name() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    let err = PlanBuilder::new().build(dir.path(), "01-test", "dev");
    assert!(matches!(err, Err(TemplateError::FinalStepNotFound(_))));
}

#[test]
fn step_without_commands_file_is_an_error() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    fs::create_dir_all(dir.path().join("steps/02-supply")).unwrap();

    let err = PlanBuilder::new().build(dir.path(), "supply", "dev");
    assert!(matches!(err, Err(TemplateError::Step { .. })));
}

#[test]
fn step_variables_are_loaded_for_the_resolved_environment() {
    let dir = template_with_steps(&[("01-test", &simple_command("unit"))]);
    let vars_dir = dir.path().join("variables/stag");
    fs::create_dir_all(&vars_dir).unwrap();
    fs::write(vars_dir.join("test.yaml"), "- name: replicas\n  value: 2\n").unwrap();

    let plan = PlanBuilder::new().build(dir.path(), "test", "stag").unwrap();
    let step = &plan.steps()[0];
    assert_eq!(step.variables().get("replicas").unwrap().value(), "2");

    // the other environment sees no variables file
    let plan = PlanBuilder::new().build(dir.path(), "test", "dev").unwrap();
    assert!(plan.steps()[0].variables().is_empty());
}

#[test]
fn duplicate_commands_in_a_step_are_rejected() {
    let commands = "- name: unit\n  cmd: make test\n- name: UNIT\n  cmd: 'make  test'\n";
    let dir = template_with_steps(&[("01-test", commands)]);
    let err = PlanBuilder::new().build(dir.path(), "test", "dev");
    assert!(matches!(err, Err(TemplateError::Step { .. })));
}
