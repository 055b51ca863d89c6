//! Test environment builder for isolated relink testing.
//!
//! Provides `TestEnv` - an isolated project directory (with `deploy.toml`
//! and a `public/` build) and an isolated HOME, plus helpers to run the
//! relink binary in it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::fixtures::{write_site, LOCAL_CONFIG};

/// Result of running a relink CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory for HOME
    pub home_dir: TempDir,
    relink_bin: PathBuf,
}

impl TestEnv {
    /// Project with the local-only `deploy.toml` and a valid `public/` site
    pub fn new() -> Self {
        let env = Self::empty();
        env.write_project_file("deploy.toml", LOCAL_CONFIG);
        write_site(&env.project_path("public"), "initial");
        env
    }

    /// Project without any files
    pub fn empty() -> Self {
        Self {
            project_root: TempDir::new().expect("Failed to create project dir"),
            home_dir: TempDir::new().expect("Failed to create home dir"),
            relink_bin: PathBuf::from(env!("CARGO_BIN_EXE_relink")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Base directory of the local environment
    pub fn deploy_path(&self, relative: &str) -> PathBuf {
        self.project_path("deploy").join(relative)
    }

    /// Run relink in this environment from project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, &[])
    }

    /// Run relink from project root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, env_vars)
    }

    /// Run relink from a specific directory with extra env vars.
    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let mut cmd = Command::new(&self.relink_bin);
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env_remove("RELINK_ENV")
            .env_remove("RUST_LOG");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute relink");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&full_path, content).expect("Failed to write file");
    }

    /// Read a file of the live release
    pub fn read_live_file(&self, relative_path: &str) -> String {
        let path = self.deploy_path("current").join(relative_path);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read live file {}: {}", relative_path, e))
    }

    /// Release ID `current` points at
    pub fn live_release(&self) -> Option<String> {
        let target = fs::read_link(self.deploy_path("current")).ok()?;
        target.file_name().map(|n| n.to_string_lossy().to_string())
    }

    /// Release directories on disk, sorted
    pub fn releases_on_disk(&self) -> Vec<String> {
        let mut ids: Vec<String> = fs::read_dir(self.deploy_path("releases"))
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        ids.sort();
        ids
    }
}
