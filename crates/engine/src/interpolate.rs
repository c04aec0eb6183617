// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${var.<name>}` placeholder interpolation

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use vex_core::VariableSet;

/// Regex pattern for `${var.name}` placeholders
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{var\.([A-Za-z0-9_]+)\}").expect("constant regex pattern is valid")
});

#[derive(Debug, Error)]
pub enum InterpolateError {
    #[error("variable '{0}' not found for interpolation")]
    MissingVariable(String),
    #[error("incomplete interpolation, a malformed placeholder remains: {0}")]
    Malformed(String),
}

/// Replace every `${var.<name>}` occurrence using the variable set.
///
/// Any reference to a variable missing from the set fails, and so does a
/// malformed `${var.` still present after substitution: a successful result
/// never contains a `${var.` residue.
pub fn interpolate(input: &str, vars: &VariableSet) -> Result<String, InterpolateError> {
    let mut missing: Option<String> = None;

    let result = VAR_PATTERN.replace_all(input, |caps: &regex::Captures| {
        let name = &caps[1];
        match vars.get(name) {
            Some(var) => var.value().to_string(),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    if let Some(name) = missing {
        return Err(InterpolateError::MissingVariable(name));
    }
    if result.contains("${var.") {
        return Err(InterpolateError::Malformed(result.into_owned()));
    }
    Ok(result.into_owned())
}

#[cfg(test)]
#[path = "interpolate_tests.rs"]
mod tests;
