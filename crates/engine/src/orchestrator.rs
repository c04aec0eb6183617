// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a full plan run.
//!
//! Per step: fingerprint, consult the state table, either skip (merging the
//! persisted variables) or materialize the workspaces and execute, then
//! promote output variables and record the new state. The first failure
//! aborts the plan; state-save and post-deploy tagging problems are
//! warnings only.

use crate::command::{CommandExecutor, CommandRunner, ExecuteError};
use crate::copy::{copy_workdir, CopyError};
use crate::fingerprint::{FingerprintError, FingerprintService};
use crate::project::{load_project, ProjectLoadError};
use crate::report::Reporter;
use crate::state_manager::{StateError, StateManager};
use crate::step::StepExecutor;
use crate::workspace::{Workspace, WorkspaceError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vex_adapters::{GitCli, GitError, ShellRunner};
use vex_core::{
    next_version, CachePolicy, CurrentState, Environment, OutputVar, Step, StepDefinition,
    StepName, VariableSet, Version, SHARED_SCOPE, STEP_DEPLOY,
};
use vex_storage::{ProjectStore, VarsStore, VarsStoreError};
use vex_template::{PlanBuilder, TemplateError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not load the project: {0}")]
    Project(#[from] ProjectLoadError),
    #[error("could not resolve the workspace: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("could not clone the template repository: {0}")]
    CloneTemplate(#[source] GitError),
    #[error("could not determine the project version: {0}")]
    Version(#[source] GitError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("could not fingerprint step '{step}': {source}")]
    Fingerprint {
        step: String,
        source: FingerprintError,
    },
    #[error("could not check the state of step '{step}': {source}")]
    State { step: String, source: StateError },
    #[error("could not load vars for step '{step}': {source}")]
    Vars {
        step: String,
        source: VarsStoreError,
    },
    #[error("could not materialize the workspace for step '{step}': {source}")]
    Copy { step: String, source: CopyError },
    #[error("step '{step}' failed: {source}")]
    Step { step: String, source: ExecuteError },
    #[error("step '{step}' failed")]
    StepFailed { step: String },
}

/// Sequences a plan run over the engine's services.
pub struct Orchestrator<R: CommandRunner> {
    project_path: PathBuf,
    home_override: Option<PathBuf>,
    policy: CachePolicy,
    reporter: Arc<dyn Reporter>,
    git: GitCli,
    fingerprints: FingerprintService,
    state: StateManager,
    vars_store: VarsStore,
    project_store: ProjectStore,
    plan_builder: PlanBuilder,
    steps: StepExecutor<CommandExecutor<R>>,
}

impl Orchestrator<ShellRunner> {
    pub fn new(
        project_path: impl Into<PathBuf>,
        policy: CachePolicy,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self::with_runner(ShellRunner::new(), project_path, policy, reporter)
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn with_runner(
        runner: R,
        project_path: impl Into<PathBuf>,
        policy: CachePolicy,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            home_override: None,
            policy,
            reporter: reporter.clone(),
            git: GitCli::new(),
            fingerprints: FingerprintService::new(),
            state: StateManager::new(),
            vars_store: VarsStore::new(),
            project_store: ProjectStore::new(),
            plan_builder: PlanBuilder::new(),
            steps: StepExecutor::new(CommandExecutor::new(runner, reporter)),
        }
    }

    /// Use a fixed vex home instead of `VEX_HOME` / `~/.vex`.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_override = Some(home.into());
        self
    }

    pub async fn execute_plan(
        &mut self,
        final_step_name: &str,
        env_name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), RunError> {
        let project = load_project(&self.project_path, &self.project_store)?;

        let workspace = match &self.home_override {
            Some(home) => Workspace::with_root(
                home.clone(),
                project.data().name(),
                project.template_repo().dir_name(),
            ),
            None => Workspace::new(project.data().name(), project.template_repo().dir_name())?,
        };

        self.git
            .ensure_cloned(
                project.template_repo().url(),
                project.template_repo().reference(),
                &workspace.template_path(),
                cancel,
            )
            .await
            .map_err(RunError::CloneTemplate)?;

        let plan = self
            .plan_builder
            .build(&workspace.template_path(), final_step_name, env_name)?;

        let (version, commit) = self.calculate_version(cancel).await?;
        let environment = plan.environment().clone();

        let mut cumulative = VariableSet::new();
        self.add_runtime_vars(&mut cumulative, &project, &version, &commit, &environment);

        self.reporter
            .plan_started(environment.name(), &version.raw, &commit.hash);

        for step_def in plan.steps() {
            let name = step_def.name().name().to_string();
            self.reporter.step_started(&name);

            let current = self.step_fingerprints(&workspace, &environment, step_def.name(), cancel)?;

            let state_path = workspace.state_table_path(&name);
            let changed = self
                .state
                .has_state_changed(&state_path, &current, self.policy)
                .map_err(|source| RunError::State {
                    step: name.clone(),
                    source,
                })?;

            let vars_step_path = workspace.vars_file_path(environment.name(), &name);
            let vars_step = self
                .vars_store
                .load(&vars_step_path)
                .map_err(|source| RunError::Vars {
                    step: name.clone(),
                    source,
                })?;
            cumulative.add_all(&vars_step);

            let vars_shared_path = workspace.vars_file_path(SHARED_SCOPE, &name);
            let vars_shared = self
                .vars_store
                .load(&vars_shared_path)
                .map_err(|source| RunError::Vars {
                    step: name.clone(),
                    source,
                })?;
            cumulative.add_all(&vars_shared);

            if !changed {
                self.reporter.step_skipped(&name);
                continue;
            }

            let step = self.materialize_step(&workspace, &environment, step_def, cancel)?;

            let result = self.steps.execute(&step, &cumulative, cancel).await;
            if result.is_failure() {
                self.reporter.failure_logs(&result.logs);
                return match result.error {
                    Some(source) => Err(RunError::Step { step: name, source }),
                    None => Err(RunError::StepFailed { step: name }),
                };
            }
            self.reporter.step_completed(&name, &result.logs);
            cumulative.add_all(&result.output_vars);

            let shared_out = result.output_vars.filter(|v| v.is_shared());
            if !shared_out.equals(&vars_shared) {
                self.vars_store
                    .save(&vars_shared_path, &shared_out)
                    .map_err(|source| RunError::Vars {
                        step: name.clone(),
                        source,
                    })?;
            }

            let step_out = result.output_vars.filter(|v| !v.is_shared());
            if !step_out.equals(&vars_step) {
                self.vars_store
                    .save(&vars_step_path, &step_out)
                    .map_err(|source| RunError::Vars {
                        step: name.clone(),
                        source,
                    })?;
            }

            if let Err(e) = self.state.update_state(&state_path, &current) {
                warn!(step = name.as_str(), error = %e, "state save failed");
                self.reporter.warning(&format!(
                    "could not save the state of step '{name}', it will re-run next time: {e}"
                ));
            }
        }

        if final_step_name == STEP_DEPLOY {
            if let Err(e) = self
                .git
                .create_tag(&self.project_path, &commit.hash, &version.raw, cancel)
                .await
            {
                self.reporter
                    .warning(&format!("could not tag commit {}: {e}", commit.short_hash()));
            }
        }

        self.reporter.plan_completed();
        Ok(())
    }

    async fn calculate_version(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Version, vex_core::Commit), RunError> {
        let commit = self
            .git
            .last_commit(&self.project_path, cancel)
            .await
            .map_err(RunError::Version)?;

        // a repository without semver tags starts from v0.0.0
        let last_tag = self
            .git
            .last_semver_tag(&self.project_path, cancel)
            .await
            .unwrap_or(None);
        let current = match &last_tag {
            Some(tag) => Version::from_tag(tag),
            None => Version::initial(),
        };
        let commits = self
            .git
            .commits_since_tag(&self.project_path, last_tag.as_deref(), cancel)
            .await
            .map_err(RunError::Version)?;

        Ok((next_version(&current, &commits), commit))
    }

    fn add_runtime_vars(
        &self,
        cumulative: &mut VariableSet,
        project: &vex_core::Project,
        version: &Version,
        commit: &vex_core::Commit,
        environment: &Environment,
    ) {
        let pairs = [
            ("project_id", project.id().short().to_string()),
            ("project_name", project.data().name().to_string()),
            (
                "project_organization",
                project.data().organization().to_string(),
            ),
            ("project_team", project.data().team().to_string()),
            ("project_version", version.raw.clone()),
            ("project_revision", commit.short_hash().to_string()),
            ("project_revision_full", commit.hash.clone()),
            ("environment", environment.name().to_string()),
            ("project_workdir", self.project_path.display().to_string()),
            ("tool_name", "vex".to_string()),
        ];
        for (name, value) in pairs {
            if let Ok(var) = OutputVar::new(name, value, false) {
                cumulative.add(var);
            }
        }
    }

    fn step_fingerprints(
        &self,
        workspace: &Workspace,
        environment: &Environment,
        step_name: &StepName,
        cancel: &CancellationToken,
    ) -> Result<CurrentState, RunError> {
        let wrap = |source| RunError::Fingerprint {
            step: step_name.name().to_string(),
            source,
        };

        let code = self
            .fingerprints
            .from_directory(&self.project_path, cancel)
            .map_err(wrap)?;
        let instruction = self
            .fingerprints
            .from_directory(&workspace.step_template_path(step_name.full_name()), cancel)
            .map_err(wrap)?;
        let vars = self
            .fingerprints
            .from_file(&workspace.vars_template_path(environment.name(), step_name.name()))
            .map_err(wrap)?;

        debug!(
            step = step_name.name(),
            code = %code,
            instruction = %instruction,
            vars = %vars,
            "step fingerprints"
        );
        Ok(CurrentState::new(
            code,
            instruction,
            vars,
            environment.clone(),
        ))
    }

    /// Copy the step template into both workspace scopes and bind the step
    /// to them.
    fn materialize_step(
        &self,
        workspace: &Workspace,
        environment: &Environment,
        step_def: &StepDefinition,
        cancel: &CancellationToken,
    ) -> Result<Step, RunError> {
        let name = step_def.name().name();
        let template = workspace.step_template_path(step_def.name().full_name());

        let env_workdir = workspace.scope_workdir_path(environment.name(), name);
        copy_workdir(&template, &env_workdir, false, cancel).map_err(|source| RunError::Copy {
            step: name.to_string(),
            source,
        })?;

        let shared_workdir = workspace.scope_workdir_path(SHARED_SCOPE, name);
        copy_workdir(&template, &shared_workdir, true, cancel).map_err(|source| {
            RunError::Copy {
                step: name.to_string(),
                source,
            }
        })?;

        Ok(Step::from_definition(step_def, env_workdir, shared_workdir))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
