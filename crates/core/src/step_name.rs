// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step directory names of the form `NN-name`

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepNameError {
    #[error("step directory name '{0}' does not match the NN-name format")]
    InvalidFormat(String),
}

/// An ordered step identifier parsed from a directory name like `02-supply`.
///
/// `order` drives execution sequencing; `name` is the bare slug used to
/// select steps and derive file paths; `full_name` is the original
/// directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepName {
    order: u32,
    name: String,
    full: String,
}

impl StepName {
    pub fn parse(raw: &str) -> Result<Self, StepNameError> {
        let invalid = || StepNameError::InvalidFormat(raw.to_string());
        let (order, name) = raw.split_once('-').ok_or_else(invalid)?;
        if order.is_empty() || !order.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let order: u32 = order.parse().map_err(|_| invalid())?;
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            order,
            name: name.to_string(),
            full: raw.to_string(),
        })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full
    }
}

impl FromStr for StepName {
    type Err = StepNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

#[cfg(test)]
#[path = "step_name_tests.rs"]
mod tests;
