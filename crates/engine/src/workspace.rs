// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace path layout under the vex home directory.
//!
//! ```text
//! <vex_home>/
//!   repositories/<template>/           # cloned template repository
//!   <project>/<template>/
//!     workdir/<scope>/<step>/          # materialized step workspaces
//!     vars/<scope>/<step>              # persisted output variables
//!     state/<step>.tb                  # per-step state tables
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the default root (`~/.vex`).
pub const VEX_HOME_ENV: &str = "VEX_HOME";

/// Directory under the user's home used when no override is set.
pub const DEFAULT_ROOT_DIR: &str = ".vex";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("could not determine the user home directory")]
    NoHomeDir,
}

/// Path derivations for one (project, template) pair.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    project_name: String,
    template_name: String,
}

impl Workspace {
    /// Root resolution: `VEX_HOME` when set, else `~/.vex`.
    pub fn new(
        project_name: impl Into<String>,
        template_name: impl Into<String>,
    ) -> Result<Self, WorkspaceError> {
        Ok(Self::with_root(
            resolve_root()?,
            project_name,
            template_name,
        ))
    }

    pub fn with_root(
        root: impl Into<PathBuf>,
        project_name: impl Into<String>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            project_name: project_name.into(),
            template_name: template_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the template repository is cloned.
    pub fn template_path(&self) -> PathBuf {
        self.root.join("repositories").join(&self.template_name)
    }

    pub fn step_template_path(&self, step_full_name: &str) -> PathBuf {
        self.template_path().join("steps").join(step_full_name)
    }

    pub fn vars_template_path(&self, environment: &str, step_name: &str) -> PathBuf {
        self.template_path()
            .join("variables")
            .join(environment)
            .join(format!("{step_name}.yaml"))
    }

    pub fn workspace_path(&self) -> PathBuf {
        self.root.join(&self.project_name).join(&self.template_name)
    }

    pub fn vars_file_path(&self, scope: &str, step_name: &str) -> PathBuf {
        self.workspace_path().join("vars").join(scope).join(step_name)
    }

    pub fn scope_workdir_path(&self, scope: &str, step_name: &str) -> PathBuf {
        self.workspace_path()
            .join("workdir")
            .join(scope)
            .join(step_name)
    }

    pub fn state_table_path(&self, step_name: &str) -> PathBuf {
        self.workspace_path()
            .join("state")
            .join(format!("{step_name}.tb"))
    }
}

fn resolve_root() -> Result<PathBuf, WorkspaceError> {
    if let Ok(home) = std::env::var(VEX_HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_ROOT_DIR))
        .ok_or(WorkspaceError::NoHomeDir)
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
