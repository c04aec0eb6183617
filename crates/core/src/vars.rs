// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output variables and cumulative variable sets

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VarError {
    #[error("variable name must not be empty")]
    EmptyName,
}

/// A named value produced by a command or declared in the template.
///
/// `shared` routes the variable to the cross-environment scope when the
/// owning step's outputs are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputVar {
    name: String,
    value: String,
    shared: bool,
}

impl OutputVar {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        shared: bool,
    ) -> Result<Self, VarError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VarError::EmptyName);
        }
        Ok(Self {
            name,
            value: value.into(),
            shared,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

/// A mapping from variable name to [`OutputVar`].
///
/// Insertion order is preserved; adding a variable with an existing name
/// overwrites the previous one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    vars: IndexMap<String, OutputVar>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, var: OutputVar) {
        self.vars.insert(var.name.clone(), var);
    }

    pub fn add_all(&mut self, other: &VariableSet) {
        for var in other.vars.values() {
            self.add(var.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&OutputVar> {
        self.vars.get(name)
    }

    pub fn filter(&self, pred: impl Fn(&OutputVar) -> bool) -> VariableSet {
        let mut out = VariableSet::new();
        for var in self.vars.values().filter(|v| pred(v)) {
            out.add(var.clone());
        }
        out
    }

    /// Set-wise equality over `(name → value)` pairs.
    ///
    /// The shared flag is a routing attribute, not identity: persisted sets
    /// always load with `shared = false`.
    pub fn equals(&self, other: &VariableSet) -> bool {
        self.vars.len() == other.vars.len()
            && self
                .vars
                .values()
                .all(|v| other.get(v.name()).is_some_and(|o| o.value() == v.value()))
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        self.vars
            .values()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputVar> {
        self.vars.values()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<OutputVar> for VariableSet {
    fn from_iter<I: IntoIterator<Item = OutputVar>>(iter: I) -> Self {
        let mut set = VariableSet::new();
        for var in iter {
            set.add(var);
        }
        set
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
