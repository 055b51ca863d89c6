//! Local filesystem deployer
//!
//! Releases live under `<base>/releases/`, cloned with hardlinks and
//! activated by renaming a fresh symlink over `<base>/current`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use tracing::{debug, warn};

use crate::domain::entities::{sort_newest_first, Manifest, Release};
use crate::domain::ports::{DeployLock, Deployer};
use crate::domain::services::{releases_to_prune, select_rollback_target};
use crate::domain::value_objects::{ReleaseId, ReleaseLayout, REQUIRED_FILES};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::{copy_replacing, hardlink_tree, join_key, remove_tree, walk_files};
use crate::infrastructure::manifest::read_manifest;

/// Deployer for a directory on this machine
#[derive(Debug, Clone)]
pub struct LocalDeployer {
    layout: ReleaseLayout,
}

impl LocalDeployer {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            layout: ReleaseLayout::new(base),
        }
    }

    pub fn layout(&self) -> &ReleaseLayout {
        &self.layout
    }

    /// Fully resolved directory `current` points at
    fn current_target(&self) -> Option<PathBuf> {
        fs::canonicalize(self.layout.current_link())
            .ok()
            .filter(|p| p.is_dir())
    }

    fn existing_release(&self, id: &ReleaseId) -> DeployResult<PathBuf> {
        let dir = self.layout.release_dir(id);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(DeployError::ReleaseNotFound {
                id: id.to_string(),
            })
        }
    }

    /// Point `current` at `id` with a single rename
    fn swap_current(&self, id: &ReleaseId) -> DeployResult<()> {
        let staging = self.layout.staging_link();
        match fs::remove_file(&staging) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        std::os::unix::fs::symlink(self.layout.relative_release(id), &staging)?;
        if let Err(e) = fs::rename(&staging, self.layout.current_link()) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        debug!(release = %id, "current -> {}", self.layout.relative_release(id).display());
        Ok(())
    }

    fn copy_into(&self, build_dir: &Path, release_dir: &Path, file: &str) -> DeployResult<u64> {
        let src = join_key(build_dir, file)?;
        let dst = join_key(release_dir, file)?;
        let bytes = copy_replacing(&src, &dst).map_err(|e| {
            DeployError::Io(io::Error::new(e.kind(), format!("copy {}: {}", file, e)))
        })?;
        debug!(path = %file, bytes, "copied");
        Ok(bytes)
    }
}

impl Deployer for LocalDeployer {
    fn describe(&self) -> String {
        format!("local ({})", self.layout.base().display())
    }

    fn fetch_manifest(&self) -> DeployResult<Manifest> {
        read_manifest(&self.layout.current_manifest())
    }

    fn create_release(&self, id: &ReleaseId) -> DeployResult<()> {
        let release_dir = self.layout.release_dir(id);
        if release_dir.exists() {
            return Err(DeployError::ReleaseExists { id: id.to_string() });
        }
        fs::create_dir_all(self.layout.releases_dir())?;

        let result = match self.current_target() {
            Some(current) => {
                debug!(from = %current.display(), to = %release_dir.display(), "hardlink clone");
                hardlink_tree(&current, &release_dir)
            }
            None => fs::create_dir(&release_dir),
        };

        result.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => DeployError::ReleaseExists { id: id.to_string() },
            _ => DeployError::Io(e),
        })
    }

    fn upload_full(&self, build_dir: &Path, id: &ReleaseId) -> DeployResult<usize> {
        let release_dir = self.existing_release(id)?;
        let files = walk_files(build_dir)?;
        for file in &files {
            self.copy_into(build_dir, &release_dir, file)?;
        }
        Ok(files.len())
    }

    fn upload_delta(
        &self,
        build_dir: &Path,
        id: &ReleaseId,
        files: &[String],
    ) -> DeployResult<()> {
        let release_dir = self.existing_release(id)?;
        for file in files {
            self.copy_into(build_dir, &release_dir, file)?;
        }
        Ok(())
    }

    fn activate(&self, id: &ReleaseId) -> DeployResult<()> {
        let release_dir = self.existing_release(id)?;

        if let Some(missing) = REQUIRED_FILES
            .iter()
            .find(|name| !release_dir.join(name).is_file())
        {
            if let Err(e) = remove_tree(&release_dir) {
                warn!(release = %id, "failed to remove invalid release: {}", e);
            }
            return Err(DeployError::Validation {
                release: id.to_string(),
                missing: missing.to_string(),
            });
        }

        self.swap_current(id)
    }

    fn cleanup(&self, keep_n: usize) -> DeployResult<Vec<String>> {
        let releases = self.list_releases()?;
        let mut removed = Vec::new();
        for release in releases_to_prune(&releases, keep_n) {
            remove_tree(&release.path).map_err(|e| {
                DeployError::Io(io::Error::new(
                    e.kind(),
                    format!("remove {}: {}", release.id, e),
                ))
            })?;
            debug!(release = %release.id, "removed");
            removed.push(release.id.clone());
        }
        Ok(removed)
    }

    fn health_check(&self, id: &ReleaseId) -> DeployResult<()> {
        let payload = self
            .health_payload()
            .map_err(|e| DeployError::health(format!("read healthz.json: {}", e)))?;
        if payload.contains(id.as_str()) {
            Ok(())
        } else {
            Err(DeployError::health(format!(
                "release ID {} not found in healthz.json",
                id
            )))
        }
    }

    fn list_releases(&self) -> DeployResult<Vec<Release>> {
        let entries = match fs::read_dir(self.layout.releases_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let current = self.current_target();
        let mut releases = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            let path = entry.path();
            let is_current = current.is_some() && fs::canonicalize(&path).ok() == current;
            releases.push(Release::new(
                entry.file_name().to_string_lossy(),
                path,
                DateTime::<Utc>::from(modified),
                is_current,
            ));
        }

        sort_newest_first(&mut releases);
        Ok(releases)
    }

    fn rollback(&self, id: Option<&ReleaseId>) -> DeployResult<ReleaseId> {
        let target = match id {
            Some(id) => id.clone(),
            None => select_rollback_target(&self.list_releases()?)?,
        };
        self.existing_release(&target)?;
        self.swap_current(&target)?;
        Ok(target)
    }

    fn current_release(&self) -> DeployResult<Option<String>> {
        Ok(self
            .current_target()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())))
    }

    fn health_payload(&self) -> DeployResult<String> {
        Ok(fs::read_to_string(self.layout.current_health_file())?)
    }

    fn lock(&self) -> DeployResult<Option<DeployLock>> {
        let path = self.layout.lock_file();
        fs::create_dir_all(self.layout.base())?;
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(DeployLock::new(file))),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(DeployError::Locked { path })
            }
            Err(e) => Err(e.into()),
        }
    }
}
