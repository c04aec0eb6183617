// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materializes a step template into a workspace directory.
//!
//! Two disjoint modes: the non-shared copy excludes any directory literally
//! named `shared`, while the shared copy takes only files whose relative
//! path contains a `shared` component. A missing source is a no-op.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use vex_core::SHARED_SCOPE;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("copy source '{0}' is not a directory")]
    NotADirectory(PathBuf),
    #[error("could not copy '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("workspace copy was cancelled")]
    Cancelled,
}

pub fn copy_workdir(
    source: &Path,
    destination: &Path,
    shared_only: bool,
    cancel: &CancellationToken,
) -> Result<(), CopyError> {
    let source_meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source_err) => {
            return Err(CopyError::Io {
                path: source.to_path_buf(),
                source: source_err,
            })
        }
    };
    if !source_meta.is_dir() {
        return Err(CopyError::NotADirectory(source.to_path_buf()));
    }

    let mut stack = vec![source.to_path_buf()];
    while let Some(current) = stack.pop() {
        if cancel.is_cancelled() {
            return Err(CopyError::Cancelled);
        }
        let entries = fs::read_dir(&current).map_err(|e| CopyError::Io {
            path: current.clone(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| CopyError::Io {
                path: current.clone(),
                source: e,
            })?;
            let path = entry.path();
            let is_dir = entry
                .file_type()
                .map_err(|e| CopyError::Io {
                    path: path.clone(),
                    source: e,
                })?
                .is_dir();
            let rel = path.strip_prefix(source).unwrap_or(&path).to_path_buf();

            if shared_only {
                if is_dir {
                    stack.push(path);
                    continue;
                }
                let inside_shared = rel
                    .components()
                    .any(|c| c.as_os_str() == SHARED_SCOPE);
                if !inside_shared {
                    continue;
                }
                copy_file(&path, &destination.join(&rel), &source_meta)?;
            } else {
                if is_dir && entry.file_name() == SHARED_SCOPE {
                    continue;
                }
                if is_dir {
                    let dest_dir = destination.join(&rel);
                    fs::create_dir_all(&dest_dir).map_err(|e| CopyError::Io {
                        path: dest_dir.clone(),
                        source: e,
                    })?;
                    stack.push(path);
                } else {
                    copy_file(&path, &destination.join(&rel), &source_meta)?;
                }
            }
        }
    }
    Ok(())
}

/// Copy one file, creating parent directories with the source root's mode.
fn copy_file(from: &Path, to: &Path, source_meta: &fs::Metadata) -> Result<(), CopyError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| CopyError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = source_meta.permissions().mode();
            let _ = fs::set_permissions(parent, fs::Permissions::from_mode(mode));
        }
    }
    #[cfg(not(unix))]
    let _ = source_meta;
    fs::copy(from, to).map_err(|e| CopyError::Io {
        path: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
