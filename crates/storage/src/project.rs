// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vexconfig.yaml` load/save

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("could not read project config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not write project config '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse project config '{path}': {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

/// The on-disk shape of `vexconfig.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    pub template: TemplateSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub organization: String,
    pub team: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub url: String,
    #[serde(rename = "ref", default)]
    pub reference: String,
}

/// Loads and saves the project configuration file.
#[derive(Debug, Default)]
pub struct ProjectStore;

impl ProjectStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> Result<ProjectConfig, ProjectStoreError> {
        let data = std::fs::read(path).map_err(|source| ProjectStoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_slice(&data).map_err(|source| ProjectStoreError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path, config: &ProjectConfig) -> Result<(), ProjectStoreError> {
        let data = serde_yaml::to_string(config).map_err(|source| ProjectStoreError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, data).map_err(|source| ProjectStoreError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
