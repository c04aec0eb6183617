// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-place interpolation of template files with restorable backups

use crate::interpolate::{interpolate, InterpolateError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vex_core::VariableSet;

#[derive(Debug, Error)]
pub enum FileProcessError {
    #[error("could not read template file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write template file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not interpolate template '{path}': {source}")]
    Interpolate {
        path: PathBuf,
        source: InterpolateError,
    },
}

/// Interpolates template files in place, keeping a backup of each file's
/// original bytes.
///
/// The first read of a path is authoritative: repeated `process` calls
/// interpolate the cached original, never the previously written output, so
/// processing is idempotent for a given variable set.
#[derive(Debug, Default)]
pub struct FileProcessor {
    backups: HashMap<PathBuf, Vec<u8>>,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(
        &mut self,
        abs_paths: &[PathBuf],
        vars: &VariableSet,
    ) -> Result<(), FileProcessError> {
        for path in abs_paths {
            let original = match self.backups.entry(path.clone()) {
                std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                std::collections::hash_map::Entry::Vacant(entry) => {
                    let original =
                        std::fs::read(path).map_err(|source| FileProcessError::Read {
                            path: path.clone(),
                            source,
                        })?;
                    entry.insert(original)
                }
            };

            let content = String::from_utf8_lossy(original);
            let interpolated =
                interpolate(&content, vars).map_err(|source| FileProcessError::Interpolate {
                    path: path.clone(),
                    source,
                })?;

            write_file(path, interpolated.as_bytes())?;
        }
        Ok(())
    }

    /// Write every cached original back. All paths are attempted; the first
    /// error seen is returned.
    pub fn restore(&self) -> Result<(), FileProcessError> {
        let mut first_error = None;
        for (path, original) in &self.backups {
            if let Err(e) = write_file(path, original) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), FileProcessError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| FileProcessError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, data).map_err(|source| FileProcessError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
