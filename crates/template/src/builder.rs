// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles an execution plan from a template repository

use crate::error::TemplateError;
use crate::reader;
use std::path::{Path, PathBuf};
use tracing::debug;
use vex_core::{Environment, ExecutionPlan, StepDefinition, StepName};

/// Builds the plan for one run: the resolved environment plus the ordered
/// step prefix ending at the requested final step, each step assembled with
/// its commands and environment-scoped variables.
#[derive(Debug, Default)]
pub struct PlanBuilder;

impl PlanBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        template_path: &Path,
        final_step_name: &str,
        env_name: &str,
    ) -> Result<ExecutionPlan, TemplateError> {
        let environment = self.resolve_environment(template_path, env_name)?;
        let steps_to_execute = self.resolve_steps(template_path, final_step_name)?;

        let mut steps = Vec::with_capacity(steps_to_execute.len());
        for step_name in steps_to_execute {
            steps.push(self.assemble_step(template_path, &step_name, &environment)?);
        }

        Ok(ExecutionPlan::new(environment, steps)?)
    }

    /// Resolve by name against `environments.yaml`; an empty name selects
    /// the first environment declared.
    fn resolve_environment(
        &self,
        template_path: &Path,
        env_name: &str,
    ) -> Result<Environment, TemplateError> {
        let mut environments = reader::read_environments(&template_path.join("environments.yaml"))?;
        if environments.is_empty() {
            return Err(TemplateError::NoEnvironments);
        }
        if env_name.is_empty() {
            return Ok(environments.remove(0));
        }
        environments
            .into_iter()
            .find(|env| env.name() == env_name)
            .ok_or_else(|| TemplateError::UnknownEnvironment(env_name.to_string()))
    }

    /// The ordered prefix of all steps up to and including the one whose
    /// bare name equals `final_step_name`.
    fn resolve_steps(
        &self,
        template_path: &Path,
        final_step_name: &str,
    ) -> Result<Vec<StepName>, TemplateError> {
        let mut all_steps = reader::read_step_names(&template_path.join("steps"))?;
        all_steps.sort_by_key(|s| s.order());

        let final_index = all_steps
            .iter()
            .position(|s| s.name() == final_step_name)
            .ok_or_else(|| TemplateError::FinalStepNotFound(final_step_name.to_string()))?;

        all_steps.truncate(final_index + 1);
        Ok(all_steps)
    }

    fn assemble_step(
        &self,
        template_path: &Path,
        step_name: &StepName,
        environment: &Environment,
    ) -> Result<StepDefinition, TemplateError> {
        let commands_path = template_path
            .join("steps")
            .join(step_name.full_name())
            .join("commands.yaml");
        let variables_path = variables_path(template_path, environment.name(), step_name.name());

        let commands = reader::read_commands(&commands_path)?;
        let variables = reader::read_variables(&variables_path)?;
        debug!(
            step = step_name.full_name(),
            commands = commands.len(),
            variables = variables.len(),
            "assembled step"
        );

        StepDefinition::new(step_name.clone(), commands, variables).map_err(|source| {
            TemplateError::Step {
                step: step_name.name().to_string(),
                source,
            }
        })
    }
}

/// Path of the variables file for `(environment, step)` inside the template.
pub fn variables_path(template_path: &Path, environment: &str, step: &str) -> PathBuf {
    template_path
        .join("variables")
        .join(environment)
        .join(format!("{step}.yaml"))
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
