// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution plan assembled from a template repository

use crate::command::Command;
use crate::environment::Environment;
use crate::step_name::StepName;
use crate::vars::{OutputVar, VariableSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("a step must declare at least one command")]
    NoCommands,
    #[error("duplicate command within step '{step}': {key}")]
    DuplicateCommand { step: String, key: String },
    #[error("duplicate variable within step '{step}': {name}")]
    DuplicateVariable { step: String, name: String },
    #[error("an execution plan must contain at least one step")]
    NoSteps,
}

/// One step of the plan: its parsed directory name, its commands, and the
/// environment-scoped variables declared for it.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    name: StepName,
    commands: Vec<Command>,
    variables: VariableSet,
}

impl StepDefinition {
    /// Validates that `(name, cmd, workdir)` triples are unique within the
    /// step (case-insensitive, whitespace-stripped) and that variable names
    /// are unique.
    pub fn new(
        name: StepName,
        commands: Vec<Command>,
        variables: Vec<OutputVar>,
    ) -> Result<Self, PlanError> {
        if commands.is_empty() {
            return Err(PlanError::NoCommands);
        }

        let mut seen = Vec::with_capacity(commands.len());
        for command in &commands {
            let key = format!(
                "{}-{}-{}",
                strip_spaces(command.name()).to_uppercase(),
                strip_spaces(command.cmd()),
                strip_spaces(command.workdir()).to_uppercase(),
            );
            if seen.contains(&key) {
                return Err(PlanError::DuplicateCommand {
                    step: name.name().to_string(),
                    key,
                });
            }
            seen.push(key);
        }

        let mut seen_vars: Vec<String> = Vec::with_capacity(variables.len());
        let mut set = VariableSet::new();
        for variable in variables {
            let var_name = strip_spaces(variable.name());
            if seen_vars.contains(&var_name) {
                return Err(PlanError::DuplicateVariable {
                    step: name.name().to_string(),
                    name: var_name,
                });
            }
            seen_vars.push(var_name);
            set.add(variable);
        }

        Ok(Self {
            name,
            commands,
            variables: set,
        })
    }

    pub fn name(&self) -> &StepName {
        &self.name
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }
}

/// The resolved plan: one environment plus the ordered step prefix ending at
/// the requested final step.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    environment: Environment,
    steps: Vec<StepDefinition>,
}

impl ExecutionPlan {
    pub fn new(environment: Environment, steps: Vec<StepDefinition>) -> Result<Self, PlanError> {
        if steps.is_empty() {
            return Err(PlanError::NoSteps);
        }
        Ok(Self { environment, steps })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
