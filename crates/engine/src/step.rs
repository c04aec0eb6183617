// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step execution: cumulative variables across commands, first failure stops

use crate::command::{CommandExecution, ExecuteError, ExecutionResult, ExecutionStatus};
use crate::resolver::resolve;
use std::fmt::Write as _;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vex_core::{OutputVar, Step, VariableSet};

/// Runs a step's commands in declaration order against a growing variable
/// set. Command outputs feed both the next command and the step's aggregated
/// outputs.
pub struct StepExecutor<C> {
    commands: C,
}

impl<C: CommandExecution> StepExecutor<C> {
    pub fn new(commands: C) -> Self {
        Self { commands }
    }

    pub fn command_execution(&self) -> &C {
        &self.commands
    }

    pub async fn execute(
        &mut self,
        step: &Step,
        initial_vars: &VariableSet,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let mut cumulative = initial_vars.clone();

        let resolved = match resolve(&cumulative, step.variables()) {
            Ok(resolved) => resolved,
            Err(source) => {
                return ExecutionResult::failure(ExecuteError::ResolveVars {
                    step: step.name().to_string(),
                    source,
                });
            }
        };
        cumulative.add_all(&resolved);

        for (name, value) in [
            ("step_workdir", step.workspace_step()),
            ("shared_workdir", step.workspace_shared()),
        ] {
            if let Ok(var) = OutputVar::new(name, value.display().to_string(), false) {
                cumulative.add(var);
            }
        }

        let mut logs = String::new();
        let mut output_vars = VariableSet::new();

        for command in step.commands() {
            let result = self
                .commands
                .execute(
                    command,
                    &cumulative,
                    step.workspace_step(),
                    step.workspace_shared(),
                    cancel,
                )
                .await;

            if !result.logs.is_empty() {
                let _ = write!(logs, "  - comando: '{}'\n{}\n", command.name(), result.logs);
            }

            if result.is_failure() {
                debug!(step = step.name(), command = command.name(), "command failed");
                let source = result.error.unwrap_or(ExecuteError::ExitCode {
                    cmd: command.cmd().to_string(),
                    code: -1,
                });
                return ExecutionResult {
                    status: ExecutionStatus::Failure,
                    logs,
                    output_vars,
                    error: Some(ExecuteError::Command {
                        name: command.name().to_string(),
                        source: Box::new(source),
                    }),
                };
            }

            cumulative.add_all(&result.output_vars);
            output_vars.add_all(&result.output_vars);
        }

        ExecutionResult {
            status: ExecutionStatus::Success,
            logs,
            output_vars,
            error: None,
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
