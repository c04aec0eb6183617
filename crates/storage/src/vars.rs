// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted variable sets, keyed by (scope, step) through their file path.

use crate::blob::{self, BlobError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use vex_core::{OutputVar, VarError, VariableSet};

#[derive(Debug, Error)]
pub enum VarsStoreError {
    #[error("could not load vars file '{path}': {source}")]
    Load { path: String, source: BlobError },
    #[error("could not save vars file '{path}': {source}")]
    Save { path: String, source: BlobError },
    #[error("vars file holds an invalid variable: {0}")]
    InvalidVar(#[from] VarError),
}

#[derive(Debug, Serialize, Deserialize)]
struct VarDto {
    name: String,
    value: String,
}

/// Loads and saves [`VariableSet`]s as blob files of `(name, value)` pairs.
///
/// The shared flag is not persisted: scope is encoded in the file's
/// location, so loaded variables always carry `shared = false`.
#[derive(Debug, Default)]
pub struct VarsStore;

impl VarsStore {
    pub fn new() -> Self {
        Self
    }

    /// Missing or zero-length files load as the empty set.
    pub fn load(&self, path: &Path) -> Result<VariableSet, VarsStoreError> {
        let dtos: Option<Vec<VarDto>> =
            blob::read(path).map_err(|source| VarsStoreError::Load {
                path: path.display().to_string(),
                source,
            })?;
        let mut set = VariableSet::new();
        for dto in dtos.unwrap_or_default() {
            set.add(OutputVar::new(dto.name, dto.value, false)?);
        }
        Ok(set)
    }

    /// Saving an empty set is a no-op: the file is left untouched.
    pub fn save(&self, path: &Path, vars: &VariableSet) -> Result<(), VarsStoreError> {
        if vars.is_empty() {
            return Ok(());
        }
        let dtos: Vec<VarDto> = vars
            .iter()
            .map(|v| VarDto {
                name: v.name().to_string(),
                value: v.value().to_string(),
            })
            .collect();
        blob::write(path, &dtos).map_err(|source| VarsStoreError::Save {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
