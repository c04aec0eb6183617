// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell commands declared by a step

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command name must not be empty")]
    EmptyName,
    #[error("command '{0}' has an empty cmd")]
    EmptyCmd(String),
    #[error("command output probe must not be empty")]
    EmptyProbe,
    #[error("command '{0}' declares duplicate template file '{1}'")]
    DuplicateTemplateFile(String, String),
    #[error("command '{0}' declares duplicate output '{1}'")]
    DuplicateOutput(String, String),
}

/// A stdout expectation attached to a command.
///
/// With a non-empty `name` the probe's first capture group becomes the value
/// of an extracted variable. With an empty `name` the probe is an assertion
/// only: it must match but extracts nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    name: String,
    probe: String,
}

impl CommandOutput {
    pub fn new(name: impl Into<String>, probe: impl Into<String>) -> Result<Self, CommandError> {
        let probe = probe.into();
        if probe.trim().is_empty() {
            return Err(CommandError::EmptyProbe);
        }
        Ok(Self {
            name: name.into(),
            probe,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn probe(&self) -> &str {
        &self.probe
    }

    pub fn is_probe_only(&self) -> bool {
        self.name.is_empty()
    }
}

/// One shell command of a step.
///
/// `workdir` is relative to the step's workspace root; when its last path
/// segment is `shared` the command runs against the shared workspace
/// instead. `template_files` are interpolated in place before the command
/// runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    cmd: String,
    workdir: String,
    template_files: Vec<String>,
    outputs: Vec<CommandOutput>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        cmd: impl Into<String>,
        workdir: impl Into<String>,
        template_files: Vec<String>,
        outputs: Vec<CommandOutput>,
    ) -> Result<Self, CommandError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CommandError::EmptyName);
        }
        let cmd = cmd.into();
        if cmd.trim().is_empty() {
            return Err(CommandError::EmptyCmd(name));
        }
        for (i, file) in template_files.iter().enumerate() {
            if template_files[..i].contains(file) {
                return Err(CommandError::DuplicateTemplateFile(name, file.clone()));
            }
        }
        for (i, output) in outputs.iter().enumerate() {
            if output.is_probe_only() {
                continue;
            }
            if outputs[..i].iter().any(|o| o.name() == output.name()) {
                return Err(CommandError::DuplicateOutput(name, output.name().to_string()));
            }
        }
        Ok(Self {
            name,
            cmd,
            workdir: workdir.into(),
            template_files,
            outputs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    pub fn workdir(&self) -> &str {
        &self.workdir
    }

    pub fn template_files(&self) -> &[String] {
        &self.template_files
    }

    pub fn outputs(&self) -> &[CommandOutput] {
        &self.outputs
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
