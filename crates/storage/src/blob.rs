// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque binary blobs: zstd-compressed JSON, written atomically.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and decode a blob. Missing or zero-length files decode as `None`.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, BlobError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if data.is_empty() {
        return Ok(None);
    }
    let json = zstd::decode_all(data.as_slice())?;
    Ok(Some(serde_json::from_slice(&json)?))
}

/// Encode and write a blob via a temp file + rename so a crash mid-write
/// cannot corrupt the previous contents.
pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), BlobError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec(value)?;
    let compressed = zstd::encode_all(json.as_slice(), 0)?;

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&compressed)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}
