// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment tokens and well-known step names

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scope name for variables and files shared across environments.
pub const SHARED_SCOPE: &str = "shared";

pub const STEP_TEST: &str = "test";
pub const STEP_SUPPLY: &str = "supply";
pub const STEP_PACKAGE: &str = "package";
pub const STEP_DEPLOY: &str = "deploy";

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("environment name must not be empty")]
    Empty,
}

/// A named target context (`dev`, `stag`, `prod`, …) or the `shared` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Result<Self, EnvironmentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EnvironmentError::Empty);
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
