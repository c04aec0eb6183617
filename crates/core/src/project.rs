// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project identity and template repository coordinates

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project {0} must not be empty")]
    EmptyField(&'static str),
    #[error("template repository url must not be empty")]
    EmptyUrl,
    #[error("template repository url '{0}' has no repository name")]
    InvalidUrl(String),
}

/// Content-derived project identifier: `sha256("{name}-{org}-{team}")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn generate(name: &str, organization: &str, team: &str) -> Self {
        let digest = Sha256::digest(format!("{name}-{organization}-{team}").as_bytes());
        Self(format!("{digest:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first eight hex characters, used for display and variables.
    pub fn short(&self) -> &str {
        if self.0.len() <= 8 { &self.0 } else { &self.0[..8] }
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive project metadata from `vexconfig.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData {
    name: String,
    organization: String,
    team: String,
    description: String,
    version: String,
}

impl ProjectData {
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<String>,
        team: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ProjectError> {
        let name = name.into();
        let organization = organization.into();
        let team = team.into();
        if name.trim().is_empty() {
            return Err(ProjectError::EmptyField("name"));
        }
        if organization.trim().is_empty() {
            return Err(ProjectError::EmptyField("organization"));
        }
        if team.trim().is_empty() {
            return Err(ProjectError::EmptyField("team"));
        }
        Ok(Self {
            name,
            organization,
            team,
            description: description.into(),
            version: version.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Where the deployment template lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRepository {
    url: String,
    reference: String,
}

impl TemplateRepository {
    /// An empty ref defaults to `main`.
    pub fn new(url: impl Into<String>, reference: impl Into<String>) -> Result<Self, ProjectError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ProjectError::EmptyUrl);
        }
        if Self::repo_name(&url).is_none() {
            return Err(ProjectError::InvalidUrl(url));
        }
        let mut reference = reference.into();
        if reference.is_empty() {
            reference = "main".to_string();
        }
        Ok(Self { url, reference })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The local directory name for the clone: the last path segment of the
    /// url with a trailing `.git` stripped.
    pub fn dir_name(&self) -> String {
        Self::repo_name(&self.url).unwrap_or_default()
    }

    fn repo_name(url: &str) -> Option<String> {
        let tail = url
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .unwrap_or("");
        let name = tail.strip_suffix(".git").unwrap_or(tail);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// The loaded project: persisted id, metadata, and template coordinates.
#[derive(Debug, Clone)]
pub struct Project {
    id: ProjectId,
    data: ProjectData,
    template_repo: TemplateRepository,
    local_path: PathBuf,
    id_dirty: bool,
}

impl Project {
    pub fn new(
        id: ProjectId,
        data: ProjectData,
        template_repo: TemplateRepository,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id,
            data,
            template_repo,
            local_path: local_path.into(),
            id_dirty: false,
        }
    }

    /// Recompute the id from the project data. Returns true (and marks the
    /// project dirty) when the persisted id drifted.
    pub fn sync_id(&mut self) -> bool {
        let generated = ProjectId::generate(
            self.data.name(),
            self.data.organization(),
            self.data.team(),
        );
        if self.id != generated {
            self.id = generated;
            self.id_dirty = true;
            return true;
        }
        false
    }

    pub fn is_id_dirty(&self) -> bool {
        self.id_dirty
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn data(&self) -> &ProjectData {
        &self.data
    }

    pub fn template_repo(&self) -> &TemplateRepository {
        &self.template_repo
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
