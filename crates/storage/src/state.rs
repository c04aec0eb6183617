// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State table persistence.
//!
//! One file per step holds the table as an opaque binary blob. Entry order
//! and the retention bound are re-established by [`StateTable::load`] when
//! reading, so the file format stays a dumb record list.

use crate::blob::{self, BlobError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use vex_core::{Environment, Fingerprint, StateEntry, StateTable};

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("could not load state table '{path}': {source}")]
    Load { path: String, source: BlobError },
    #[error("could not save state table '{path}': {source}")]
    Save { path: String, source: BlobError },
    #[error("state entry has an invalid environment: {0}")]
    InvalidEnvironment(#[from] vex_core::EnvironmentError),
}

#[derive(Debug, Serialize, Deserialize)]
struct StateTableDto {
    name: String,
    entries: Vec<StateEntryDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateEntryDto {
    code: String,
    instruction: String,
    environment: String,
    vars: String,
    created_at: DateTime<Utc>,
}

/// Loads and saves [`StateTable`]s as per-step blob files.
#[derive(Debug, Default)]
pub struct StateStore;

impl StateStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a table. A missing or empty file is not an error: there is
    /// simply no state yet.
    pub fn load(&self, path: &Path) -> Result<Option<StateTable>, StateStoreError> {
        let dto: Option<StateTableDto> =
            blob::read(path).map_err(|source| StateStoreError::Load {
                path: path.display().to_string(),
                source,
            })?;
        let Some(dto) = dto else {
            return Ok(None);
        };

        let mut entries = Vec::with_capacity(dto.entries.len());
        for entry in dto.entries {
            entries.push(StateEntry::at(
                Fingerprint::new(entry.code),
                Fingerprint::new(entry.instruction),
                Fingerprint::new(entry.vars),
                Environment::new(entry.environment)?,
                entry.created_at,
            ));
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded state table");
        Ok(Some(StateTable::load(dto.name, entries)))
    }

    pub fn save(&self, path: &Path, table: &StateTable) -> Result<(), StateStoreError> {
        let dto = StateTableDto {
            name: table.name().to_string(),
            entries: table
                .entries()
                .iter()
                .map(|e| StateEntryDto {
                    code: e.code().to_string(),
                    instruction: e.instruction().to_string(),
                    environment: e.environment().name().to_string(),
                    vars: e.vars().to_string(),
                    created_at: e.created_at(),
                })
                .collect(),
        };
        blob::write(path, &dto).map_err(|source| StateStoreError::Save {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
