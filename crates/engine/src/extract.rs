// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extraction of output variables from command stdout

use regex::Regex;
use thiserror::Error;
use vex_core::{CommandOutput, OutputVar, VarError, VariableSet};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid regex for output '{name}': {source}")]
    InvalidProbe { name: String, source: regex::Error },
    #[error("output variable '{name}' was not found in the command output (probe: {probe})")]
    NotFound { name: String, probe: String },
    #[error("output variable '{name}' extracted an empty value (probe: {probe})")]
    EmptyCapture { name: String, probe: String },
    #[error("could not create output variable: {0}")]
    Var(#[from] VarError),
}

/// Run every named output's probe over the normalized stdout and collect the
/// captured values.
///
/// A named output requires its regex to match with a non-empty first
/// capture. Probe-only outputs (empty name) extract nothing here; their
/// match requirement is enforced separately by the command executor.
pub fn extract_vars(
    command_output: &str,
    outputs: &[CommandOutput],
) -> Result<VariableSet, ExtractError> {
    let mut extracted = VariableSet::new();

    for output in outputs {
        let probe = Regex::new(output.probe()).map_err(|source| ExtractError::InvalidProbe {
            name: output.name().to_string(),
            source,
        })?;

        if output.is_probe_only() {
            continue;
        }

        let capture = probe
            .captures(command_output)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| ExtractError::NotFound {
                name: output.name().to_string(),
                probe: output.probe().to_string(),
            })?;
        if capture.as_str().is_empty() {
            return Err(ExtractError::EmptyCapture {
                name: output.name().to_string(),
                probe: output.probe().to_string(),
            });
        }

        extracted.add(OutputVar::new(output.name(), capture.as_str(), false)?);
    }

    Ok(extracted)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
