//! Remote (SSH) deployer
//!
//! Queries and mutations are single generated shell scripts; uploads stream a
//! tar+gzip archive into a remote extractor. The transport is pluggable so
//! the same scripts can run against the local machine in tests.

mod script;
mod shell;
mod upload;

pub use shell::{shell_quote, LocalShell, RemoteShell, ShellOutput, SshShell};
pub use upload::write_archive;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::entities::{sort_newest_first, Manifest, Release};
use crate::domain::ports::Deployer;
use crate::domain::services::{releases_to_prune, select_rollback_target};
use crate::domain::value_objects::{ReleaseId, ReleaseLayout};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::walk_files;
use crate::infrastructure::manifest::parse_manifest;

/// Deployer driving a host through a [`RemoteShell`]
pub struct RemoteDeployer<S: RemoteShell = SshShell> {
    shell: S,
    layout: ReleaseLayout,
    health_url: Option<String>,
}

impl RemoteDeployer<SshShell> {
    /// Deployer for `user@host` with releases under `path`
    pub fn ssh(target: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::with_shell(SshShell::new(target), path)
    }
}

impl<S: RemoteShell> RemoteDeployer<S> {
    pub fn with_shell(shell: S, path: impl Into<PathBuf>) -> Self {
        Self {
            shell,
            layout: ReleaseLayout::new(path),
            health_url: None,
        }
    }

    /// URL fetched on the host for health checks. Without one the check
    /// reads `current/healthz.json`, which only suits shells that run
    /// against this machine
    pub fn with_health_url(mut self, url: Option<String>) -> Self {
        self.health_url = url;
        self
    }

    pub fn health_url(&self) -> Option<&str> {
        self.health_url.as_deref()
    }

    pub fn layout(&self) -> &ReleaseLayout {
        &self.layout
    }

    /// Run a script, mapping a non-zero exit to a transport error
    fn run(&self, operation: &str, script: &str) -> DeployResult<String> {
        debug!(operation, "remote script");
        let output = self.shell.run_script(script)?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(DeployError::transport(operation, output.failure_message()))
        }
    }

    fn location(&self, path: &Path) -> String {
        format!("{}:{}", self.shell.describe(), path.display())
    }

    fn parse_releases(&self, listing: &str) -> Vec<Release> {
        let mut releases: Vec<Release> = listing
            .lines()
            .filter_map(|line| {
                let fields: Vec<&str> = line.split_whitespace().collect();
                let [name, mtime, current] = fields.as_slice() else {
                    return None;
                };
                let created_at = DateTime::<Utc>::from_timestamp(mtime.parse().ok()?, 0)?;
                Some(Release::new(
                    *name,
                    self.layout.releases_dir().join(name),
                    created_at,
                    *current == "true",
                ))
            })
            .collect();
        sort_newest_first(&mut releases);
        releases
    }

    fn swap(&self, operation: &str, id: &ReleaseId, script: String) -> DeployResult<()> {
        let output = self.shell.run_script(&script)?;
        match output.code {
            Some(0) => Ok(()),
            Some(script::EXIT_NO_RELEASE) => Err(DeployError::ReleaseNotFound {
                id: id.to_string(),
            }),
            Some(script::EXIT_INVALID) => Err(DeployError::Validation {
                release: id.to_string(),
                missing: output.stdout.trim().to_string(),
            }),
            _ => Err(DeployError::transport(operation, output.failure_message())),
        }
    }
}

impl<S: RemoteShell> Deployer for RemoteDeployer<S> {
    fn describe(&self) -> String {
        format!("{}:{}", self.shell.describe(), self.layout.base().display())
    }

    fn fetch_manifest(&self) -> DeployResult<Manifest> {
        let location = self.location(&self.layout.current_manifest());
        let output = self
            .shell
            .run_script(&script::fetch_manifest(&self.layout))?;
        match output.code {
            Some(0) => parse_manifest(output.stdout.as_bytes(), &location),
            Some(script::EXIT_NOT_FOUND) => Err(DeployError::ManifestNotFound { location }),
            _ => Err(DeployError::transport(
                "fetch manifest",
                output.failure_message(),
            )),
        }
    }

    fn create_release(&self, id: &ReleaseId) -> DeployResult<()> {
        let output = self
            .shell
            .run_script(&script::create_release(&self.layout, id))?;
        match output.code {
            Some(0) => Ok(()),
            Some(script::EXIT_EXISTS) => Err(DeployError::ReleaseExists { id: id.to_string() }),
            _ => Err(DeployError::transport(
                "create release",
                output.failure_message(),
            )),
        }
    }

    fn upload_full(&self, build_dir: &Path, id: &ReleaseId) -> DeployResult<usize> {
        let files = walk_files(build_dir)?;
        self.upload_delta(build_dir, id, &files)?;
        Ok(files.len())
    }

    fn upload_delta(
        &self,
        build_dir: &Path,
        id: &ReleaseId,
        files: &[String],
    ) -> DeployResult<()> {
        if files.is_empty() {
            return Ok(());
        }
        let child = self
            .shell
            .spawn_streaming(&script::extract(&self.layout, id))?;
        upload::stream_to(child, build_dir, files)?;
        Ok(())
    }

    fn activate(&self, id: &ReleaseId) -> DeployResult<()> {
        self.swap("activate", id, script::activate(&self.layout, id))
    }

    fn cleanup(&self, keep_n: usize) -> DeployResult<Vec<String>> {
        let releases = self.list_releases()?;
        let doomed = releases_to_prune(&releases, keep_n);
        if doomed.is_empty() {
            return Ok(Vec::new());
        }
        self.run(
            "cleanup",
            &script::remove_releases(doomed.iter().map(|r| r.path.as_path())),
        )?;
        Ok(doomed.into_iter().map(|r| r.id.clone()).collect())
    }

    fn health_check(&self, id: &ReleaseId) -> DeployResult<()> {
        let payload = self
            .health_payload()
            .map_err(|e| DeployError::health(format!("release {} not live: {}", id, e)))?;
        if payload.contains(id.as_str()) {
            Ok(())
        } else {
            Err(DeployError::health(format!("release {} not live", id)))
        }
    }

    fn list_releases(&self) -> DeployResult<Vec<Release>> {
        let listing = self.run("list releases", &script::list_releases(&self.layout))?;
        Ok(self.parse_releases(&listing))
    }

    fn rollback(&self, id: Option<&ReleaseId>) -> DeployResult<ReleaseId> {
        let target = match id {
            Some(id) => id.clone(),
            None => select_rollback_target(&self.list_releases()?)?,
        };
        self.swap("rollback", &target, script::rollback(&self.layout, &target))?;
        Ok(target)
    }

    fn current_release(&self) -> DeployResult<Option<String>> {
        let out = self.run("current release", &script::current_release(&self.layout))?;
        let id = out.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    fn health_payload(&self) -> DeployResult<String> {
        self.run(
            "health",
            &script::health_payload(&self.layout, self.health_url.as_deref()),
        )
    }
}
