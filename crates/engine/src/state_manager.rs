// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skip decisions and state updates over the persisted tables

use chrono::Utc;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use vex_core::{CachePolicy, CurrentState, MatcherError, StateEntry, StateTable, StepMatcher};
use vex_storage::{StateStore, StateStoreError};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Store(#[from] StateStoreError),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Answers "has this step changed since a matching run?" and records new
/// runs into the step's state table.
#[derive(Debug, Default)]
pub struct StateManager {
    store: StateStore,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// An absent table means no history: changed. Otherwise the step's
    /// matcher scans the entries; any hit means unchanged.
    pub fn has_state_changed(
        &self,
        table_path: &Path,
        current: &CurrentState,
        policy: CachePolicy,
    ) -> Result<bool, StateError> {
        let Some(table) = self.store.load(table_path)? else {
            return Ok(true);
        };

        let matcher = StepMatcher::for_step(table.name(), policy)?;
        let now = Utc::now();
        let hit = table
            .entries()
            .iter()
            .any(|entry| matcher.matches(entry, current, now));
        debug!(table = table.name(), hit, "cache check");
        Ok(!hit)
    }

    /// Append an entry for the current run, creating the table (named after
    /// the file, extension stripped) when none exists yet.
    pub fn update_state(
        &self,
        table_path: &Path,
        current: &CurrentState,
    ) -> Result<(), StateError> {
        let mut table = match self.store.load(table_path)? {
            Some(table) => table,
            None => StateTable::new(table_name(table_path)),
        };
        table.append(StateEntry::from_current(current));
        self.store.save(table_path, &table)?;
        Ok(())
    }
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "state_manager_tests.rs"]
mod tests;
