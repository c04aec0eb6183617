// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step execution history used for skip decisions.
//!
//! Each step keeps a bounded, time-ordered table of [`StateEntry`] records.
//! Entries are immutable once written; the table evicts from the oldest end.

use crate::environment::Environment;
use crate::fingerprint::Fingerprint;
use chrono::{DateTime, Utc};

/// Maximum number of entries retained per step.
pub const MAX_ENTRIES: usize = 10;

/// The fingerprints computed fresh for a step on the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentState {
    code: Fingerprint,
    instruction: Fingerprint,
    vars: Fingerprint,
    environment: Environment,
}

impl CurrentState {
    pub fn new(
        code: Fingerprint,
        instruction: Fingerprint,
        vars: Fingerprint,
        environment: Environment,
    ) -> Self {
        Self {
            code,
            instruction,
            vars,
            environment,
        }
    }

    pub fn code(&self) -> &Fingerprint {
        &self.code
    }

    pub fn instruction(&self) -> &Fingerprint {
        &self.instruction
    }

    pub fn vars(&self) -> &Fingerprint {
        &self.vars
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

/// A historical record of one successful step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    code: Fingerprint,
    instruction: Fingerprint,
    vars: Fingerprint,
    environment: Environment,
    created_at: DateTime<Utc>,
}

impl StateEntry {
    /// A new entry stamped with the current UTC time.
    pub fn new(
        code: Fingerprint,
        instruction: Fingerprint,
        vars: Fingerprint,
        environment: Environment,
    ) -> Self {
        Self::at(code, instruction, vars, environment, Utc::now())
    }

    /// An entry with an explicit timestamp (used when loading persisted state).
    pub fn at(
        code: Fingerprint,
        instruction: Fingerprint,
        vars: Fingerprint,
        environment: Environment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            instruction,
            vars,
            environment,
            created_at,
        }
    }

    pub fn from_current(current: &CurrentState) -> Self {
        Self::new(
            current.code.clone(),
            current.instruction.clone(),
            current.vars.clone(),
            current.environment.clone(),
        )
    }

    pub fn code(&self) -> &Fingerprint {
        &self.code
    }

    pub fn instruction(&self) -> &Fingerprint {
        &self.instruction
    }

    pub fn vars(&self) -> &Fingerprint {
        &self.vars
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A step's ordered, bounded collection of state entries.
///
/// Invariants: entries sorted by `created_at` ascending, at most
/// [`MAX_ENTRIES`] retained, overflow evicts the oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    name: String,
    entries: Vec<StateEntry>,
}

impl StateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Rebuild a table from persisted entries: re-sort by `created_at` and
    /// drop the oldest beyond the retention bound.
    pub fn load(name: impl Into<String>, mut entries: Vec<StateEntry>) -> Self {
        entries.sort_by_key(|e| e.created_at);
        if entries.len() > MAX_ENTRIES {
            entries.drain(..entries.len() - MAX_ENTRIES);
        }
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Insert an entry keeping ascending `created_at` order, evicting the
    /// oldest when the table would overflow. Appending an entry older than
    /// everything retained in a full table is a net no-op.
    pub fn append(&mut self, entry: StateEntry) {
        let pos = self
            .entries
            .partition_point(|e| e.created_at <= entry.created_at);
        self.entries.insert(pos, entry);
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
