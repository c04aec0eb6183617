// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while reading a template or building a plan

use std::path::PathBuf;
use thiserror::Error;
use vex_core::{CommandError, EnvironmentError, PlanError, VarError};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("no environments defined in environments.yaml")]
    NoEnvironments,
    #[error("environment '{0}' is not defined")]
    UnknownEnvironment(String),
    #[error("final step '{0}' was not found")]
    FinalStepNotFound(String),
    #[error("invalid step '{step}': {source}")]
    Step { step: String, source: PlanError },
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Var(#[from] VarError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}
