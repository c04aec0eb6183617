// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-point resolution of variable sets that reference each other

use crate::interpolate::{interpolate, InterpolateError};
use thiserror::Error;
use tracing::debug;
use vex_core::{OutputVar, VariableSet};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular dependency or missing variable, could not resolve: {}", names.join(", "))]
    CycleOrMissing { names: Vec<String> },
    #[error("could not resolve all variables, remaining: {}", names.join(", "))]
    UnresolvedAfterBound { names: Vec<String> },
}

/// Resolve `vars_to_resolve` against the already-resolved `initial_vars`.
///
/// Variables whose values contain no `${var.` reference are static and pass
/// through. The rest are interpolated iteratively, each success enlarging
/// the context, bounded by `|pending| + 1` passes. A full pass without
/// progress aborts, reporting every remaining name. The scope (shared flag)
/// of each variable is preserved from its source.
pub fn resolve(
    initial_vars: &VariableSet,
    vars_to_resolve: &VariableSet,
) -> Result<VariableSet, ResolveError> {
    let mut pending: Vec<OutputVar> = Vec::new();
    let mut resolved = VariableSet::new();
    for var in vars_to_resolve.iter() {
        if var.value().contains("${var.") {
            pending.push(var.clone());
        } else {
            resolved.add(var.clone());
        }
    }

    if pending.is_empty() {
        return Ok(vars_to_resolve.clone());
    }

    let mut context = initial_vars.clone();
    context.add_all(&resolved);

    let max_passes = pending.len() + 1;
    for pass in 0..max_passes {
        if pending.is_empty() {
            break;
        }

        let mut made_progress = false;
        let mut still_pending = Vec::new();

        for var in pending {
            match interpolate(var.value(), &context) {
                Ok(value) => {
                    if let Ok(resolved_var) = OutputVar::new(var.name(), value, var.is_shared()) {
                        context.add(resolved_var.clone());
                        resolved.add(resolved_var);
                    }
                    made_progress = true;
                }
                Err(InterpolateError::MissingVariable(_) | InterpolateError::Malformed(_)) => {
                    still_pending.push(var);
                }
            }
        }

        pending = still_pending;
        debug!(pass, remaining = pending.len(), "resolver pass");

        if !made_progress {
            return Err(ResolveError::CycleOrMissing {
                names: pending.iter().map(|v| v.name().to_string()).collect(),
            });
        }
    }

    if !pending.is_empty() {
        return Err(ResolveError::UnresolvedAfterBound {
            names: pending.iter().map(|v| v.name().to_string()).collect(),
        });
    }

    Ok(resolved)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
