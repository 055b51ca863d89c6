//! Release entity - one directory under `releases/`

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A release as listed on a target.
///
/// `current` is derived from the `current` symlink at listing time; it is not
/// stored per release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub current: bool,
}

impl Release {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        created_at: DateTime<Utc>,
        current: bool,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            created_at,
            current,
        }
    }
}

/// Order releases newest first.
///
/// Ties on creation time fall back to descending ID, which matches creation
/// order for generated IDs.
pub fn sort_newest_first(releases: &mut [Release]) {
    releases.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
