//! On-disk release layout.
//!
//! ```text
//! <base>/releases/<id>/...                 one directory per release
//! <base>/current -> releases/<id>          symlink, atomically swapped
//! <base>/releases/<id>/build-manifest.json
//! ```
//!
//! The same arithmetic serves local paths and remote paths handed to the
//! remote shell.

use std::path::{Path, PathBuf};

use super::ReleaseId;

/// Manifest filename inside every build and release
pub const MANIFEST_FILE: &str = "build-manifest.json";

/// Health payload; must embed the release ID once live
pub const HEALTH_FILE: &str = "healthz.json";

/// Files a release must contain before it may be activated
pub const REQUIRED_FILES: [&str; 3] = [HEALTH_FILE, "index.html", "sw.js"];

const RELEASES_DIR: &str = "releases";
const CURRENT_LINK: &str = "current";
const STAGING_LINK: &str = "current.new";
const LOCK_FILE: &str = ".deploy.lock";

/// Path arithmetic for a deployment base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLayout {
    base: PathBuf,
}

impl ReleaseLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn releases_dir(&self) -> PathBuf {
        self.base.join(RELEASES_DIR)
    }

    pub fn release_dir(&self, id: &ReleaseId) -> PathBuf {
        self.releases_dir().join(id.as_str())
    }

    /// Symlink target stored in `current`, relative to the base directory
    pub fn relative_release(&self, id: &ReleaseId) -> PathBuf {
        Path::new(RELEASES_DIR).join(id.as_str())
    }

    pub fn current_link(&self) -> PathBuf {
        self.base.join(CURRENT_LINK)
    }

    /// Temporary name the new symlink is created under before the rename
    pub fn staging_link(&self) -> PathBuf {
        self.base.join(STAGING_LINK)
    }

    pub fn current_manifest(&self) -> PathBuf {
        self.current_link().join(MANIFEST_FILE)
    }

    pub fn current_health_file(&self) -> PathBuf {
        self.current_link().join(HEALTH_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.base.join(LOCK_FILE)
    }
}
