// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loading the project and keeping its content-derived id in sync

use std::path::Path;
use thiserror::Error;
use tracing::info;
use vex_core::{Project, ProjectData, ProjectId, TemplateRepository};
use vex_storage::{ProjectStore, ProjectStoreError};

#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error(transparent)]
    Store(#[from] ProjectStoreError),
    #[error("invalid project data: {0}")]
    Invalid(#[from] vex_core::ProjectError),
}

/// Load `vexconfig.yaml` from the project root. When the persisted id does
/// not match the computed one the file is rewritten with the fresh id.
pub fn load_project(project_path: &Path, store: &ProjectStore) -> Result<Project, ProjectLoadError> {
    let config_path = project_path.join("vexconfig.yaml");
    let mut config = store.load(&config_path)?;

    let data = ProjectData::new(
        &config.project.name,
        &config.project.organization,
        &config.project.team,
        &config.project.description,
        &config.project.version,
    )?;
    let template_repo = TemplateRepository::new(&config.template.url, &config.template.reference)?;

    let mut project = Project::new(
        ProjectId::new(&config.project.id),
        data,
        template_repo,
        project_path,
    );

    if project.sync_id() {
        info!(id = %project.id().short(), "project id drifted, rewriting vexconfig.yaml");
        config.project.id = project.id().to_string();
        store.save(&config_path, &config)?;
    }

    Ok(project)
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
