// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console presenter for plan execution

use crate::color;
use vex_engine::Reporter;

/// Prints run progress to stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Reporter for ConsolePresenter {
    fn plan_started(&self, environment: &str, version: &str, commit: &str) {
        println!("Starting plan execution...");
        println!("  - Environment: {environment}");
        println!("  - Version: {version}");
        println!("  - Commit: {commit}");
    }

    fn step_started(&self, step: &str) {
        println!("Executing step {step} ...");
    }

    fn step_skipped(&self, step: &str) {
        println!("  - Step '{step}' already ran in this environment. Skipping.");
    }

    fn command_started(&self, command: &str) {
        println!("Executing: '{command}'");
    }

    fn step_completed(&self, step: &str, logs: &str) {
        println!("  - Step '{step}' completed:");
        if !logs.is_empty() {
            println!("{logs}");
        }
    }

    fn failure_logs(&self, logs: &str) {
        println!("--- Failure logs ---");
        println!("{logs}");
        println!("--------------------");
    }

    fn warning(&self, message: &str) {
        println!("{}", color::yellow(&format!("WARNING: {message}")));
    }

    fn plan_completed(&self) {
        println!("{}", color::green("Execution completed successfully!"));
    }
}
