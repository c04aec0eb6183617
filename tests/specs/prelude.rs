//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for scaffolding a project repository, a template
//! repository, and an isolated VEX_HOME, then running the vex binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Returns the path to the vex binary.
///
/// Resolves relative to the test binary itself (target/debug/deps/specs-*)
/// so it works regardless of where the workspace was checked out.
fn vex_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/vex");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("vex");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

pub fn git(dir: &Path, args: &[&str]) {
    let out = Command::new("git")
        .arg("-c")
        .arg("user.name=spec")
        .arg("-c")
        .arg("user.email=spec@example.com")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git runs");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

const ENVIRONMENTS: &str = "- value: development\n  name: dev\n- value: staging\n  name: stag\n";

/// Declarative template + project scaffold.
pub struct FixtureBuilder {
    steps: Vec<(String, String)>,
    files: Vec<(String, String)>,
    variables: Vec<(String, String, String)>,
}

pub fn fixture() -> FixtureBuilder {
    FixtureBuilder {
        steps: Vec::new(),
        files: Vec::new(),
        variables: Vec::new(),
    }
}

impl FixtureBuilder {
    /// Add `steps/<full_name>/commands.yaml` to the template.
    pub fn step(mut self, full_name: &str, commands_yaml: &str) -> Self {
        self.steps.push((full_name.into(), commands_yaml.into()));
        self
    }

    /// Add an arbitrary file under `steps/` in the template.
    pub fn step_file(mut self, rel: &str, content: &str) -> Self {
        self.files.push((format!("steps/{rel}"), content.into()));
        self
    }

    /// Add `variables/<env>/<step>.yaml` to the template.
    pub fn variables(mut self, env: &str, step: &str, yaml: &str) -> Self {
        self.variables
            .push((env.into(), step.into(), yaml.into()));
        self
    }

    pub fn build(self) -> Fixture {
        let home = TempDir::new().unwrap();
        let template = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        // template repository (cloned by vex on first run)
        let template_root = template.path().join("template-repo");
        std::fs::create_dir_all(&template_root).unwrap();
        std::fs::write(template_root.join("environments.yaml"), ENVIRONMENTS).unwrap();
        for (full_name, commands) in &self.steps {
            let dir = template_root.join("steps").join(full_name);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("commands.yaml"), commands).unwrap();
        }
        for (rel, content) in &self.files {
            let path = template_root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        for (env, step, yaml) in &self.variables {
            let dir = template_root.join("variables").join(env);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(format!("{step}.yaml")), yaml).unwrap();
        }
        git(&template_root, &["init", "-q", "-b", "main"]);
        git(&template_root, &["add", "."]);
        git(&template_root, &["commit", "-q", "-m", "template"]);

        // project repository
        std::fs::write(
            project.path().join("vexconfig.yaml"),
            format!(
                concat!(
                    "project:\n",
                    "  id: ''\n",
                    "  name: specapp\n",
                    "  organization: acme\n",
                    "  team: platform\n",
                    "  version: 1.0.0\n",
                    "template:\n",
                    "  url: {}\n",
                    "  ref: main\n",
                ),
                template_root.display()
            ),
        )
        .unwrap();
        std::fs::write(project.path().join("app.txt"), "v1\n").unwrap();
        git(project.path(), &["init", "-q", "-b", "main"]);
        git(project.path(), &["add", "."]);
        git(project.path(), &["commit", "-q", "-m", "feat: initial"]);

        Fixture {
            home,
            project,
            _template: template,
        }
    }
}

pub struct Fixture {
    pub home: TempDir,
    pub project: TempDir,
    _template: TempDir,
}

impl Fixture {
    /// Run the vex binary in the project directory with VEX_HOME isolated.
    pub fn vex(&self, args: &[&str]) -> Output {
        Command::new(vex_binary())
            .args(args)
            .current_dir(self.project.path())
            .env("VEX_HOME", self.home.path())
            .env_remove("NO_COLOR")
            .output()
            .expect("vex binary runs")
    }

    pub fn project_path(&self) -> &Path {
        self.project.path()
    }

    /// The workspace directory for this project inside VEX_HOME.
    pub fn workspace_path(&self) -> PathBuf {
        self.home.path().join("specapp").join("template-repo")
    }

    pub fn change_project_code(&self) {
        std::fs::write(self.project.path().join("app.txt"), "v2\n").unwrap();
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success.\nstdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure.\nstdout:\n{}",
        stdout(output)
    );
    assert_eq!(output.status.code(), Some(1));
}
