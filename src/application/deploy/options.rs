//! Deploy Options
//!
//! Configuration types for deploy operations.

use std::path::PathBuf;

use crate::domain::value_objects::ReleaseId;
use crate::infrastructure::manifest::DEFAULT_WORKERS;

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Directory the site builder writes into
    pub build_dir: PathBuf,
    /// Explicit release ID; generated from time and revision when absent
    pub release_id: Option<ReleaseId>,
    /// Compute and report the delta, then stop before touching the target
    pub dry_run: bool,
    /// Upload every file even when a live manifest exists
    pub full: bool,
    /// Skip the site builder and deploy `build_dir` as is
    pub no_build: bool,
    /// Hashing worker count
    pub workers: usize,
}

impl DeployOptions {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            release_id: None,
            dry_run: false,
            full: false,
            no_build: false,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_release_id(mut self, release_id: Option<ReleaseId>) -> Self {
        self.release_id = release_id;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    pub fn with_no_build(mut self, no_build: bool) -> Self {
        self.no_build = no_build;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_and_upload_delta() {
        let options = DeployOptions::new("public");
        assert_eq!(options.build_dir, PathBuf::from("public"));
        assert!(!options.dry_run);
        assert!(!options.full);
        assert!(!options.no_build);
        assert!(options.release_id.is_none());
        assert_eq!(options.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn workers_never_drop_below_one() {
        assert_eq!(DeployOptions::new("public").with_workers(0).workers, 1);
    }
}
