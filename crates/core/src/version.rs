// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic version calculus over conventional commits.
//!
//! Pure logic: the git history itself is supplied by the caller.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Commits scanned when no previous semver tag exists.
pub const COMMIT_SCAN_LIMIT: usize = 250;

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
static SEMVER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static CONVENTIONAL_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|build|chore|ci|docs|style|refactor|perf|test)(\(.*\))?(!?):")
        .expect("constant regex pattern is valid")
});

/// A git commit as seen by the version calculator.
#[derive(Debug, Clone)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

impl Commit {
    /// The first eight characters of the hash.
    pub fn short_hash(&self) -> &str {
        if self.hash.len() <= 8 {
            &self.hash
        } else {
            &self.hash[..8]
        }
    }
}

/// A semantic version with its raw tag representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub raw: String,
}

impl Version {
    /// Parse a semver tag like `v1.2.3` or `1.2.3`; anything else yields the
    /// initial `v0.0.0`.
    pub fn from_tag(tag: &str) -> Self {
        Self::parse_tag(tag).unwrap_or_else(Self::initial)
    }

    /// Strict parse: `None` when the tag is not `v?MAJOR.MINOR.PATCH`.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let caps = SEMVER_TAG.captures(tag)?;
        Some(Self {
            major: caps[1].parse().unwrap_or(0),
            minor: caps[2].parse().unwrap_or(0),
            patch: caps[3].parse().unwrap_or(0),
            raw: tag.to_string(),
        })
    }

    pub fn initial() -> Self {
        Self {
            major: 0,
            minor: 0,
            patch: 0,
            raw: "v0.0.0".to_string(),
        }
    }

    /// A date-stamped pre-release version, for runs forced off the tag
    /// history.
    pub fn dated(now: DateTime<Utc>) -> Self {
        Self {
            major: 0,
            minor: 0,
            patch: 0,
            raw: format!("v0.0.0-{}", now.format("%Y%m%d%H%M%S")),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ChangeLevel {
    None,
    Patch,
    Minor,
    Major,
}

/// Compute the next version from the commits made since the tag that
/// produced `current`.
///
/// `BREAKING CHANGE` in a message or a `!` on a conventional type bumps the
/// major; `feat` the minor; `fix` the patch. Without any recognized change
/// the current version is returned untouched.
pub fn next_version(current: &Version, commits: &[Commit]) -> Version {
    let mut highest = ChangeLevel::None;

    for commit in commits {
        if commit.message.contains("BREAKING CHANGE") {
            highest = ChangeLevel::Major;
            break;
        }
        if let Some(caps) = CONVENTIONAL_COMMIT.captures(&commit.message) {
            if caps.get(3).is_some_and(|m| m.as_str() == "!") {
                highest = ChangeLevel::Major;
                break;
            }
            let level = match &caps[1] {
                "feat" => ChangeLevel::Minor,
                "fix" => ChangeLevel::Patch,
                _ => ChangeLevel::None,
            };
            highest = highest.max(level);
        }
    }

    let mut next = current.clone();
    match highest {
        ChangeLevel::None => return next,
        ChangeLevel::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        ChangeLevel::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        ChangeLevel::Patch => next.patch += 1,
    }
    next.raw = format!("v{}.{}.{}", next.major, next.minor, next.patch);
    next
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
