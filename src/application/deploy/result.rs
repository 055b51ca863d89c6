//! Deploy Result
//!
//! Result types for deploy operations.

use crate::domain::services::Delta;
use crate::domain::value_objects::ReleaseId;
use crate::error::DeployWarning;

/// How the release directory was populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Not reached (dry run)
    None,
    /// Every file of the build
    Full,
    /// Changed files plus the manifest
    Delta,
    /// Clone of the live release was already identical
    Skipped,
}

/// Result of a deploy operation
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// Release that was (or, for a dry run, would have been) created
    pub release_id: ReleaseId,
    /// Release ID of the manifest that was live before this deploy
    pub previous: Option<String>,
    /// Delta between the local build and the live release
    pub delta: Delta,
    /// Bytes of the changed files
    pub changed_bytes: u64,
    /// Bytes of the whole build
    pub total_bytes: u64,
    /// Nothing on the target was touched
    pub dry_run: bool,
    pub upload: UploadKind,
    /// Files sent to the target
    pub uploaded: usize,
    /// Release IDs removed by retention cleanup
    pub removed: Vec<String>,
    /// Problems after activation; the release is live regardless
    pub warnings: Vec<DeployWarning>,
}

impl DeployReport {
    pub fn new(release_id: ReleaseId) -> Self {
        Self {
            release_id,
            previous: None,
            delta: Delta::default(),
            changed_bytes: 0,
            total_bytes: 0,
            dry_run: false,
            upload: UploadKind::None,
            uploaded: 0,
            removed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Live without warnings
    pub fn is_success(&self) -> bool {
        self.warnings.is_empty()
    }

    /// `current` was moved to the new release
    pub fn is_live(&self) -> bool {
        !self.dry_run
    }

    pub fn is_first_deploy(&self) -> bool {
        self.previous.is_none()
    }
}
