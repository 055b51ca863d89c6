//! Release retention and rollback selection.
//!
//! Both deployers list releases newest first and then defer to these rules,
//! so cleanup and rollback behave identically on local and remote targets.

use crate::domain::entities::Release;
use crate::domain::value_objects::ReleaseId;
use crate::error::DeployError;

/// Releases to delete so that only the newest `keep_n` remain.
///
/// `releases` must be ordered newest first. The current release is never
/// returned, even when it falls outside the retained window.
pub fn releases_to_prune(releases: &[Release], keep_n: usize) -> Vec<&Release> {
    releases
        .iter()
        .skip(keep_n)
        .filter(|release| !release.current)
        .collect()
}

/// Pick the rollback target when none was named: the newest release that is
/// not current.
pub fn select_rollback_target(releases: &[Release]) -> Result<ReleaseId, DeployError> {
    let release = releases
        .iter()
        .find(|release| !release.current)
        .ok_or(DeployError::NoPreviousRelease)?;
    ReleaseId::parse(&release.id)
}
