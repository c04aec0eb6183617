// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SHA-256 fingerprints of files and directory trees.
//!
//! Directory fingerprints are traversal-order independent: each surviving
//! file contributes a `"<rel_path>:<sha256>"` line, the lines are sorted,
//! and the final digest hashes the newline-joined list.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vex_core::Fingerprint;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("could not read '{path}' while hashing: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not compile .gitignore under '{path}': {source}")]
    Gitignore {
        path: PathBuf,
        source: ignore::Error,
    },
    #[error("fingerprinting was cancelled")]
    Cancelled,
}

/// Computes content fingerprints for the cache decision.
#[derive(Debug, Clone, Default)]
pub struct FingerprintService;

impl FingerprintService {
    pub fn new() -> Self {
        Self
    }

    /// Fingerprint of a file's bytes. A missing file yields the absent
    /// fingerprint, not an error.
    pub fn from_file(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        match std::fs::read(path) {
            Ok(data) => Ok(Fingerprint::from_bytes(&data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fingerprint::absent()),
            Err(source) => Err(FingerprintError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Fingerprint of a directory tree, honoring a root `.gitignore` and
    /// skipping `.git` entirely. A missing root yields the absent
    /// fingerprint.
    pub fn from_directory(
        &self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<Fingerprint, FingerprintError> {
        match std::fs::metadata(dir) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Fingerprint::absent())
            }
            Err(source) => {
                return Err(FingerprintError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }

        let matcher = load_gitignore(dir)?;
        let mut lines = Vec::new();
        let mut stack = vec![dir.to_path_buf()];

        while let Some(current) = stack.pop() {
            if cancel.is_cancelled() {
                return Err(FingerprintError::Cancelled);
            }
            let entries = std::fs::read_dir(&current).map_err(|source| FingerprintError::Io {
                path: current.clone(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| FingerprintError::Io {
                    path: current.clone(),
                    source,
                })?;
                let path = entry.path();
                let is_dir = entry
                    .file_type()
                    .map_err(|source| FingerprintError::Io {
                        path: path.clone(),
                        source,
                    })?
                    .is_dir();

                if is_dir && entry.file_name() == ".git" {
                    continue;
                }

                let rel = path.strip_prefix(dir).unwrap_or(&path);
                if let Some(matcher) = &matcher {
                    if matcher.matched(rel, is_dir).is_ignore() {
                        continue;
                    }
                }

                if is_dir {
                    stack.push(path);
                } else {
                    let file_fp = self.from_file(&path)?;
                    lines.push(format!("{}:{}", rel.display(), file_fp));
                }
            }
        }

        lines.sort();
        debug!(dir = %dir.display(), files = lines.len(), "fingerprinted directory");
        Ok(Fingerprint::from_bytes(lines.join("\n").as_bytes()))
    }
}

fn load_gitignore(dir: &Path) -> Result<Option<Gitignore>, FingerprintError> {
    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        return Ok(None);
    }
    let mut builder = GitignoreBuilder::new(dir);
    if let Some(source) = builder.add(&gitignore_path) {
        return Err(FingerprintError::Gitignore {
            path: gitignore_path,
            source,
        });
    }
    let matcher = builder.build().map_err(|source| FingerprintError::Gitignore {
        path: gitignore_path,
        source,
    })?;
    Ok(Some(matcher))
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
