// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A step bound to its materialized workspaces, ready to execute

use crate::command::Command;
use crate::plan::StepDefinition;
use crate::vars::VariableSet;
use std::path::{Path, PathBuf};

/// A plan step mapped onto the workspace directories it will run against.
#[derive(Debug, Clone)]
pub struct Step {
    name: String,
    commands: Vec<Command>,
    variables: VariableSet,
    workspace_step: PathBuf,
    workspace_shared: PathBuf,
}

impl Step {
    pub fn from_definition(
        definition: &StepDefinition,
        workspace_step: impl Into<PathBuf>,
        workspace_shared: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: definition.name().name().to_string(),
            commands: definition.commands().to_vec(),
            variables: definition.variables().clone(),
            workspace_step: workspace_step.into(),
            workspace_shared: workspace_shared.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    pub fn workspace_step(&self) -> &Path {
        &self.workspace_step
    }

    pub fn workspace_shared(&self) -> &Path {
        &self.workspace_shared
    }
}
