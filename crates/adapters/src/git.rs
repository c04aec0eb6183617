// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git CLI adapter.
//!
//! History reads use `%x1f` (unit) and `%x1e` (record) separators so commit
//! bodies with newlines survive parsing.

use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vex_core::{Commit, Version, COMMIT_SCAN_LIMIT};

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

#[derive(Debug, Error)]
pub enum GitError {
    #[error("could not start git {action}: {source}")]
    Spawn {
        action: String,
        source: std::io::Error,
    },
    #[error("git {action} failed (exit {code}): {stderr}")]
    Exec {
        action: String,
        code: i32,
        stderr: String,
    },
    #[error("git {action} was cancelled")]
    Cancelled { action: String },
    #[error("could not parse git {action} output: {detail}")]
    Parse { action: String, detail: String },
}

/// Talks to git by spawning the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Clone `url` at `reference` into `local_path` unless a repository is
    /// already there.
    pub async fn ensure_cloned(
        &self,
        url: &str,
        reference: &str,
        local_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), GitError> {
        if local_path.join(".git").exists() {
            debug!(path = %local_path.display(), "template already cloned");
            return Ok(());
        }
        let dest = local_path.display().to_string();
        self.run(
            "clone",
            &["clone", "--branch", reference, url, dest.as_str()],
            None,
            cancel,
        )
        .await?;
        Ok(())
    }

    /// The commit currently at HEAD.
    pub async fn last_commit(
        &self,
        repo_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Commit, GitError> {
        let format = format!("--format=%H{FIELD_SEP}%B{FIELD_SEP}%an{FIELD_SEP}%aI{RECORD_SEP}");
        let stdout = self
            .run("log", &["log", "-1", format.as_str()], Some(repo_path), cancel)
            .await?;
        parse_commits("log", &stdout)?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::Parse {
                action: "log".to_string(),
                detail: "no commits in repository".to_string(),
            })
    }

    /// Commits reachable from HEAD but not from `last_tag`. Without a tag
    /// the scan is capped at [`COMMIT_SCAN_LIMIT`] commits.
    pub async fn commits_since_tag(
        &self,
        repo_path: &Path,
        last_tag: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Commit>, GitError> {
        let format = format!("--format=%H{FIELD_SEP}%B{FIELD_SEP}%an{FIELD_SEP}%aI{RECORD_SEP}");
        let limit = format!("-{COMMIT_SCAN_LIMIT}");
        let range = last_tag.map(|tag| format!("{tag}..HEAD"));
        let mut args: Vec<&str> = vec!["log", format.as_str()];
        match &range {
            Some(range) => args.push(range.as_str()),
            None => args.push(limit.as_str()),
        }
        let stdout = self.run("log", &args, Some(repo_path), cancel).await?;
        parse_commits("log", &stdout)
    }

    /// The highest tag matching `v?MAJOR.MINOR.PATCH`, or `None`.
    pub async fn last_semver_tag(
        &self,
        repo_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, GitError> {
        let stdout = self
            .run("tag", &["tag", "--list"], Some(repo_path), cancel)
            .await?;
        let best = stdout
            .lines()
            .filter_map(|line| Version::parse_tag(line.trim()))
            .max_by_key(|v| (v.major, v.minor, v.patch));
        Ok(best.map(|v| v.raw))
    }

    /// Tag `commit_hash` with `tag_name`.
    pub async fn create_tag(
        &self,
        repo_path: &Path,
        commit_hash: &str,
        tag_name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), GitError> {
        self.run(
            "tag",
            &["tag", tag_name, commit_hash],
            Some(repo_path),
            cancel,
        )
        .await?;
        Ok(())
    }

    async fn run(
        &self,
        action: &str,
        args: &[&str],
        dir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<String, GitError> {
        let mut cmd = tokio::process::Command::new("git");
        cmd.args(args).kill_on_drop(true);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = tokio::select! {
            output = cmd.output() => output.map_err(|source| GitError::Spawn {
                action: action.to_string(),
                source,
            })?,
            _ = cancel.cancelled() => {
                return Err(GitError::Cancelled {
                    action: action.to_string(),
                });
            }
        };

        if !output.status.success() {
            return Err(GitError::Exec {
                action: action.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_commits(action: &str, stdout: &str) -> Result<Vec<Commit>, GitError> {
    let mut commits = Vec::new();
    for record in stdout.split(RECORD_SEP) {
        let record = record.trim_matches(['\n', ' ']);
        if record.is_empty() {
            continue;
        }
        let mut fields = record.split(FIELD_SEP);
        let (Some(hash), Some(message), Some(author), Some(date)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(GitError::Parse {
                action: action.to_string(),
                detail: format!("malformed log record: {record:?}"),
            });
        };
        let date = DateTime::parse_from_rfc3339(date.trim())
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| GitError::Parse {
                action: action.to_string(),
                detail: format!("bad author date '{date}': {e}"),
            })?;
        commits.push(Commit {
            hash: hash.trim().to_string(),
            message: message.trim().to_string(),
            author: author.trim().to_string(),
            date,
        });
    }
    Ok(commits)
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
