// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-command execution: template processing, interpolation, shell run,
//! probe validation, and output extraction.

use crate::extract::{extract_vars, ExtractError};
use crate::files::{FileProcessError, FileProcessor};
use crate::interpolate::{interpolate, InterpolateError};
use crate::report::Reporter;
use crate::resolver::ResolveError;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vex_core::{Command, CommandOutput, VarError, VariableSet, SHARED_SCOPE};
use vex_adapters::{ShellError, ShellOutput, ShellRunner};

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("failed to process template files: {0}")]
    Templates(#[source] FileProcessError),
    #[error("failed to interpolate the command: {0}")]
    Interpolate(#[source] InterpolateError),
    #[error("could not start the command: {0}")]
    Spawn(#[source] ShellError),
    #[error("command '{cmd}' failed with exit code {code}")]
    ExitCode { cmd: String, code: i32 },
    #[error("invalid output probe '{probe}': {source}")]
    InvalidProbe { probe: String, source: regex::Error },
    #[error("probe '{probe}' found no match in the command output")]
    ProbeMiss { probe: String },
    #[error("failed to extract outputs: {0}")]
    Extract(#[source] ExtractError),
    #[error("invalid output variable '{name}': {source}")]
    OutputVar { name: String, source: VarError },
    #[error("failed to resolve variables for step '{step}': {source}")]
    ResolveVars { step: String, source: ResolveError },
    #[error("command '{name}' failed: {source}")]
    Command {
        name: String,
        #[source]
        source: Box<ExecuteError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure,
}

/// Outcome of a command or step execution.
#[derive(Debug)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub logs: String,
    pub output_vars: VariableSet,
    pub error: Option<ExecuteError>,
}

impl ExecutionResult {
    pub fn success(logs: String, output_vars: VariableSet) -> Self {
        Self {
            status: ExecutionStatus::Success,
            logs,
            output_vars,
            error: None,
        }
    }

    pub fn failure(error: ExecuteError) -> Self {
        Self::failure_with_logs(String::new(), error)
    }

    pub fn failure_with_logs(logs: String, error: ExecuteError) -> Self {
        Self {
            status: ExecutionStatus::Failure,
            logs,
            output_vars: VariableSet::new(),
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == ExecutionStatus::Failure || self.error.is_some()
    }
}

/// The shell seam, mockable in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        workdir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<ShellOutput, ShellError>;
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(
        &self,
        command: &str,
        workdir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<ShellOutput, ShellError> {
        ShellRunner::run(self, command, workdir, cancel).await
    }
}

/// The command-execution seam the step executor drives.
#[async_trait]
pub trait CommandExecution: Send {
    async fn execute(
        &mut self,
        command: &Command,
        current_vars: &VariableSet,
        workspace_step: &Path,
        workspace_shared: &Path,
        cancel: &CancellationToken,
    ) -> ExecutionResult;
}

/// Executes one command against its workspace.
pub struct CommandExecutor<R> {
    runner: R,
    files: FileProcessor,
    reporter: Arc<dyn Reporter>,
}

impl<R: CommandRunner> CommandExecutor<R> {
    pub fn new(runner: R, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            runner,
            files: FileProcessor::new(),
            reporter,
        }
    }

    /// The file processor with the backups accumulated so far.
    pub fn file_processor(&self) -> &FileProcessor {
        &self.files
    }
}

#[async_trait]
impl<R: CommandRunner> CommandExecution for CommandExecutor<R> {
    async fn execute(
        &mut self,
        command: &Command,
        current_vars: &VariableSet,
        workspace_step: &Path,
        workspace_shared: &Path,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let is_shared = Path::new(command.workdir())
            .file_name()
            .is_some_and(|name| name == SHARED_SCOPE);
        let workspace_main = if is_shared {
            workspace_shared
        } else {
            workspace_step
        };

        let command_dir = join_workdir(workspace_main, command.workdir());
        let abs_template_files: Vec<PathBuf> = command
            .template_files()
            .iter()
            .map(|file| command_dir.join(file))
            .collect();

        if let Err(e) = self.files.process(&abs_template_files, current_vars) {
            return ExecutionResult::failure(ExecuteError::Templates(e));
        }

        let interpolated_cmd = match interpolate(command.cmd(), current_vars) {
            Ok(cmd) => cmd,
            Err(e) => return ExecutionResult::failure(ExecuteError::Interpolate(e)),
        };

        let exec_dir = if command.workdir().is_empty() {
            None
        } else {
            Some(command_dir.as_path())
        };

        self.reporter.command_started(command.name());
        debug!(command = command.name(), cmd = %interpolated_cmd, "executing");

        let output = match self.runner.run(&interpolated_cmd, exec_dir, cancel).await {
            Ok(output) => output,
            Err(e) => return ExecutionResult::failure(ExecuteError::Spawn(e)),
        };

        if output.exit_code != 0 {
            return ExecutionResult::failure_with_logs(
                output.combined_output(),
                ExecuteError::ExitCode {
                    cmd: interpolated_cmd,
                    code: output.exit_code,
                },
            );
        }

        if let Err(e) = check_probes(&output.normalized_stdout, command.outputs()) {
            return ExecutionResult::failure_with_logs(output.combined_output(), e);
        }

        let extracted = match extract_vars(&output.normalized_stdout, command.outputs()) {
            Ok(extracted) => extracted,
            Err(e) => {
                return ExecutionResult::failure_with_logs(
                    output.combined_output(),
                    ExecuteError::Extract(e),
                )
            }
        };

        let mut output_vars = VariableSet::new();
        for var in extracted.iter() {
            match vex_core::OutputVar::new(var.name(), var.value(), is_shared) {
                Ok(stamped) => output_vars.add(stamped),
                Err(source) => {
                    return ExecutionResult::failure_with_logs(
                        output.combined_output(),
                        ExecuteError::OutputVar {
                            name: var.name().to_string(),
                            source,
                        },
                    )
                }
            }
        }

        ExecutionResult::success(output.combined_output(), output_vars)
    }
}

/// Every declared output's probe must match the normalized stdout, named or
/// not.
fn check_probes(stdout: &str, outputs: &[CommandOutput]) -> Result<(), ExecuteError> {
    for output in outputs {
        let probe = Regex::new(output.probe()).map_err(|source| ExecuteError::InvalidProbe {
            probe: output.probe().to_string(),
            source,
        })?;
        if !probe.is_match(stdout) {
            return Err(ExecuteError::ProbeMiss {
                probe: output.probe().to_string(),
            });
        }
    }
    Ok(())
}

fn join_workdir(base: &Path, workdir: &str) -> PathBuf {
    if workdir.is_empty() {
        base.to_path_buf()
    } else {
        base.join(workdir)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
