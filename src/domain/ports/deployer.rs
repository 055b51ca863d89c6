//! Deployer Port
//!
//! A place files can be released to and activated on. The orchestrator is
//! written once against this trait; the local filesystem and SSH backends
//! implement it.

use std::path::Path;

use crate::domain::entities::{Manifest, Release};
use crate::domain::value_objects::ReleaseId;
use crate::error::DeployResult;

/// Exclusive hold on a deploy target, released on drop
pub struct DeployLock {
    _guard: Box<dyn Send>,
}

impl DeployLock {
    pub fn new<G: Send + 'static>(guard: G) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

impl std::fmt::Debug for DeployLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DeployLock")
    }
}

/// Release lifecycle operations on one environment.
///
/// Contract shared by every implementation:
///
/// - `create_release` hardlink-clones the live release (or creates an empty
///   directory on first deploy).
/// - Uploads break hardlinks before writing so earlier releases stay
///   byte-identical.
/// - `activate` validates marker files, deleting the release on failure, and
///   moves `current` with a single rename.
/// - `cleanup` never removes the live release.
pub trait Deployer {
    /// Human-readable target, e.g. `local (./deploy)` or `user@host:/srv/site`
    fn describe(&self) -> String;

    /// Manifest of the live release.
    ///
    /// Returns `DeployError::ManifestNotFound` when nothing is live yet;
    /// callers treat that as an empty manifest.
    fn fetch_manifest(&self) -> DeployResult<Manifest>;

    fn create_release(&self, id: &ReleaseId) -> DeployResult<()>;

    /// Copy every file under `build_dir` into the release.
    ///
    /// Returns the number of files written.
    fn upload_full(&self, build_dir: &Path, id: &ReleaseId) -> DeployResult<usize>;

    /// Copy only `files` (relative, `/`-separated) into the release.
    fn upload_delta(&self, build_dir: &Path, id: &ReleaseId, files: &[String])
        -> DeployResult<()>;

    fn activate(&self, id: &ReleaseId) -> DeployResult<()>;

    /// Delete all but the newest `keep_n` releases; returns the removed IDs.
    fn cleanup(&self, keep_n: usize) -> DeployResult<Vec<String>>;

    /// Confirm the live health payload embeds `id`.
    fn health_check(&self, id: &ReleaseId) -> DeployResult<()>;

    /// Releases on the target, newest first
    fn list_releases(&self) -> DeployResult<Vec<Release>>;

    /// Point `current` at `id`, or at the newest non-current release when
    /// `id` is `None`. Skips marker validation.
    fn rollback(&self, id: Option<&ReleaseId>) -> DeployResult<ReleaseId>;

    /// ID of the live release, if any
    fn current_release(&self) -> DeployResult<Option<String>>;

    /// Raw health payload of the live release
    fn health_payload(&self) -> DeployResult<String>;

    /// Serialize deploys to this target.
    ///
    /// `None` means the backend cannot guard against concurrent deploys.
    fn lock(&self) -> DeployResult<Option<DeployLock>> {
        Ok(None)
    }
}

impl<T: Deployer + ?Sized> Deployer for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch_manifest(&self) -> DeployResult<Manifest> {
        (**self).fetch_manifest()
    }

    fn create_release(&self, id: &ReleaseId) -> DeployResult<()> {
        (**self).create_release(id)
    }

    fn upload_full(&self, build_dir: &Path, id: &ReleaseId) -> DeployResult<usize> {
        (**self).upload_full(build_dir, id)
    }

    fn upload_delta(
        &self,
        build_dir: &Path,
        id: &ReleaseId,
        files: &[String],
    ) -> DeployResult<()> {
        (**self).upload_delta(build_dir, id, files)
    }

    fn activate(&self, id: &ReleaseId) -> DeployResult<()> {
        (**self).activate(id)
    }

    fn cleanup(&self, keep_n: usize) -> DeployResult<Vec<String>> {
        (**self).cleanup(keep_n)
    }

    fn health_check(&self, id: &ReleaseId) -> DeployResult<()> {
        (**self).health_check(id)
    }

    fn list_releases(&self) -> DeployResult<Vec<Release>> {
        (**self).list_releases()
    }

    fn rollback(&self, id: Option<&ReleaseId>) -> DeployResult<ReleaseId> {
        (**self).rollback(id)
    }

    fn current_release(&self) -> DeployResult<Option<String>> {
        (**self).current_release()
    }

    fn health_payload(&self) -> DeployResult<String> {
        (**self).health_payload()
    }

    fn lock(&self) -> DeployResult<Option<DeployLock>> {
        (**self).lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Flag(Arc<AtomicBool>);

    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn lock_releases_guard_on_drop() {
        let dropped = Arc::new(AtomicBool::new(false));
        let lock = DeployLock::new(Flag(dropped.clone()));
        assert!(!dropped.load(Ordering::SeqCst));
        drop(lock);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
