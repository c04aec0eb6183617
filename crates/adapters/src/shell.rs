// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command execution via the platform shell.
//!
//! Commands run under `sh -c` (or `cmd /C` on windows) with stdout and
//! stderr captured separately. Both raw and normalized streams are exposed:
//! probe matching and output extraction run on the normalized form, while
//! user-facing logs keep the raw bytes.

use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ANSI_CSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("constant regex pattern is valid")
});

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("could not start command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("command '{command}' was cancelled")]
    Cancelled { command: String },
}

/// Captured output of one shell command.
#[derive(Debug, Clone, Default)]
pub struct ShellOutput {
    pub raw_stdout: String,
    pub raw_stderr: String,
    pub normalized_stdout: String,
    pub normalized_stderr: String,
    pub exit_code: i32,
}

impl ShellOutput {
    /// Raw stdout followed by raw stderr, as shown to the user.
    pub fn combined_output(&self) -> String {
        let mut combined = self.raw_stdout.clone();
        combined.push_str(&self.raw_stderr);
        combined
    }
}

/// Strip ANSI CSI sequences, fold CRLF to LF, and trim outer whitespace.
pub fn normalize(stream: &str) -> String {
    let folded = stream.replace("\r\n", "\n");
    ANSI_CSI.replace_all(&folded, "").trim().to_string()
}

/// Runs shell commands as cancellable subprocesses.
///
/// A non-zero exit code is not a runner error: it is reported through
/// [`ShellOutput::exit_code`]. Only spawn failures and cancellation are.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(
        &self,
        command: &str,
        workdir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<ShellOutput, ShellError> {
        let mut cmd = if cfg!(windows) {
            let mut cmd = tokio::process::Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command, workdir = ?workdir, "running shell command");

        let output = tokio::select! {
            output = cmd.output() => output.map_err(|source| ShellError::Spawn {
                command: command.to_string(),
                source,
            })?,
            _ = cancel.cancelled() => {
                return Err(ShellError::Cancelled {
                    command: command.to_string(),
                });
            }
        };

        let raw_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let raw_stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        Ok(ShellOutput {
            normalized_stdout: normalize(&raw_stdout),
            normalized_stderr: normalize(&raw_stderr),
            raw_stdout,
            raw_stderr,
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
