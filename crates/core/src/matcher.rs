// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step-specific cache-hit predicates over state entries.
//!
//! Every matcher requires the instruction and vars fingerprints to match.
//! The variant chosen by step name adds its own predicate on top; unknown
//! step names fail matcher construction so the caller falls back to the
//! safe "changed" default.

use crate::environment::{STEP_DEPLOY, STEP_PACKAGE, STEP_SUPPLY, STEP_TEST};
use crate::state::{CurrentState, StateEntry};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("no state matcher found for name: {0}")]
    UnknownStep(String),
}

/// Time-to-live policy consulted by the `test` matcher.
///
/// A zero TTL means entries expire immediately: `test` always re-executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
}

impl CachePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(secs.min(i64::MAX as u64) as i64),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_secs(0)
    }
}

/// The cache-hit predicate for one step type.
#[derive(Debug, Clone)]
pub enum StepMatcher {
    Test { policy: CachePolicy },
    Supply,
    Package,
    Deploy,
}

impl StepMatcher {
    /// Build the matcher for a step name. Fails closed for unknown names.
    pub fn for_step(name: &str, policy: CachePolicy) -> Result<Self, MatcherError> {
        match name {
            STEP_TEST => Ok(Self::Test { policy }),
            STEP_SUPPLY => Ok(Self::Supply),
            STEP_PACKAGE => Ok(Self::Package),
            STEP_DEPLOY => Ok(Self::Deploy),
            other => Err(MatcherError::UnknownStep(other.to_string())),
        }
    }

    /// Whether `entry` counts as a cache hit for `current` at time `now`.
    pub fn matches(&self, entry: &StateEntry, current: &CurrentState, now: DateTime<Utc>) -> bool {
        if entry.instruction() != current.instruction() || entry.vars() != current.vars() {
            return false;
        }
        match self {
            Self::Test { policy } => {
                let expires_at = entry.created_at() + policy.ttl();
                now <= expires_at && entry.code() == current.code()
            }
            Self::Supply => entry.environment().name() == current.environment().name(),
            Self::Package => entry.code() == current.code(),
            Self::Deploy => {
                entry.code() == current.code()
                    && entry.environment().name() == current.environment().name()
            }
        }
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
