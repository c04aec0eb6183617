// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress sink consumed by the orchestrator.
//!
//! The engine narrates a run through this trait; the CLI plugs in a console
//! presenter, tests use [`NullReporter`].

/// Output-only collaborator of the orchestrator.
pub trait Reporter: Send + Sync {
    /// The plan is resolved and about to run.
    fn plan_started(&self, environment: &str, version: &str, commit: &str);

    fn step_started(&self, step: &str);

    /// The step matched a prior run and will not execute.
    fn step_skipped(&self, step: &str);

    fn command_started(&self, command: &str);

    fn step_completed(&self, step: &str, logs: &str);

    /// The logs of a failed step, shown before the run aborts.
    fn failure_logs(&self, logs: &str);

    /// A non-fatal problem (state save, post-deploy tagging).
    fn warning(&self, message: &str);

    fn plan_completed(&self);
}

/// A reporter that swallows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn plan_started(&self, _environment: &str, _version: &str, _commit: &str) {}
    fn step_started(&self, _step: &str) {}
    fn step_skipped(&self, _step: &str) {}
    fn command_started(&self, _command: &str) {}
    fn step_completed(&self, _step: &str, _logs: &str) {}
    fn failure_logs(&self, _logs: &str) {}
    fn warning(&self, _message: &str) {}
    fn plan_completed(&self) {}
}
