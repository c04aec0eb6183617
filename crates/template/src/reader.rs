// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML readers for the template repository files.
//!
//! Missing files read as empty collections; the builder decides which of
//! them are actually required.

use crate::error::TemplateError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use vex_core::{Command, CommandOutput, Environment, OutputVar, StepName};

#[derive(Debug, Deserialize)]
struct EnvironmentDto {
    #[serde(default)]
    value: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OutputDto {
    #[serde(default)]
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
    probe: String,
}

#[derive(Debug, Deserialize)]
struct CommandDto {
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
    cmd: String,
    #[serde(default)]
    workdir: String,
    #[serde(default)]
    template_files: Vec<String>,
    #[serde(default)]
    outputs: Vec<OutputDto>,
}

#[derive(Debug, Deserialize)]
struct VariableDto {
    name: String,
    #[serde(default)]
    value: serde_yaml::Value,
}

/// Read `environments.yaml`: a list of `{value, name}` entries.
///
/// `name` is the token used to select the environment and scope paths;
/// `value` is a free-form label carried by the template.
pub fn read_environments(path: &Path) -> Result<Vec<Environment>, TemplateError> {
    let Some(data) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let dtos: Vec<EnvironmentDto> = parse_yaml(path, &data)?;
    dtos.into_iter()
        .map(|dto| {
            debug!(name = %dto.name, value = %dto.value, "environment");
            Ok(Environment::new(dto.name)?)
        })
        .collect()
}

/// Scan the `steps/` directory for `NN-name` subdirectories.
///
/// Entries that do not match the grammar are ignored.
pub fn read_step_names(steps_dir: &Path) -> Result<Vec<StepName>, TemplateError> {
    let entries = match std::fs::read_dir(steps_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TemplateError::Read {
                path: steps_dir.to_path_buf(),
                source,
            })
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Read {
            path: steps_dir.to_path_buf(),
            source,
        })?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Ok(name) = StepName::parse(&entry.file_name().to_string_lossy()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Read a step's `commands.yaml`.
pub fn read_commands(path: &Path) -> Result<Vec<Command>, TemplateError> {
    let Some(data) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let dtos: Vec<CommandDto> = parse_yaml(path, &data)?;
    dtos.into_iter()
        .map(|dto| {
            let outputs = dto
                .outputs
                .into_iter()
                .map(|o| CommandOutput::new(o.name, o.probe))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::new(
                dto.name,
                dto.cmd,
                dto.workdir,
                dto.template_files,
                outputs,
            )?)
        })
        .collect()
}

/// Read an optional variables file: a list of `{name, value}` entries.
///
/// Values may be any YAML scalar and are carried as strings.
pub fn read_variables(path: &Path) -> Result<Vec<OutputVar>, TemplateError> {
    let Some(data) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let dtos: Vec<VariableDto> = parse_yaml(path, &data)?;
    dtos.into_iter()
        .map(|dto| Ok(OutputVar::new(dto.name, scalar_to_string(&dto.value), false)?))
        .collect()
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, TemplateError> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TemplateError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_yaml<T: serde::de::DeserializeOwned>(
    path: &Path,
    data: &[u8],
) -> Result<Vec<T>, TemplateError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_slice(data).map_err(|source| TemplateError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
