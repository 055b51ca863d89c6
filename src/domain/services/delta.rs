//! Delta Domain Service
//!
//! Compares a local build manifest against the manifest of the live release.
//! Pure and deterministic: no I/O, every output list sorted by path.

use crate::domain::entities::Manifest;

/// Difference between a local and a remote manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// New locally, or digest differs from remote
    pub changed: Vec<String>,
    /// Present on both sides with the same digest
    pub unchanged: Vec<String>,
    /// Present remotely but absent locally
    pub deleted: Vec<String>,
}

impl Delta {
    /// Nothing to upload
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Compute the delta between `local` and `remote`.
///
/// `changed ∪ unchanged` is exactly the local key set; `deleted` is the
/// remote keys missing locally.
pub fn compute_delta(local: &Manifest, remote: &Manifest) -> Delta {
    let mut delta = Delta::default();

    for (path, info) in local.files() {
        match remote.get(path) {
            Some(remote_info) if remote_info.same_content(info) => {
                delta.unchanged.push(path.clone())
            }
            _ => delta.changed.push(path.clone()),
        }
    }

    delta.deleted = remote
        .files()
        .keys()
        .filter(|path| !local.contains(path))
        .cloned()
        .collect();

    delta.changed.sort();
    delta.unchanged.sort();
    delta.deleted.sort();
    delta
}

/// Total bytes of the `changed` files according to `local`.
///
/// Progress reporting only; paths missing from `local` count as zero.
pub fn delta_size(local: &Manifest, changed: &[String]) -> u64 {
    changed
        .iter()
        .filter_map(|path| local.get(path))
        .fold(0u64, |total, info| total.saturating_add(info.size))
}
