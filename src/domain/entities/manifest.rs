//! Manifest entity - the content-addressed snapshot of a build
//!
//! A manifest maps every regular file under a build root (relative path,
//! `/`-separated) to its SHA-256 digest and size. It is created fresh for
//! every deploy and every remote fetch and never mutated afterwards; the only
//! ways in are the constructor and deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::value_objects::ContentHash;

/// Digest and size of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub sha256: ContentHash,
    pub size: u64,
}

impl FileInfo {
    pub fn new(sha256: ContentHash, size: u64) -> Self {
        Self { sha256, size }
    }

    /// Delta equality: digests match. Size is informational only.
    pub fn same_content(&self, other: &FileInfo) -> bool {
        self.sha256.matches(&other.sha256)
    }
}

/// Build manifest, serialized as `build-manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    files: BTreeMap<String, FileInfo>,
    #[serde(rename = "releaseId", default, skip_serializing_if = "String::is_empty")]
    release_id: String,
    #[serde(rename = "buildTime", default, skip_serializing_if = "Option::is_none")]
    build_time: Option<DateTime<Utc>>,
}

impl Manifest {
    pub fn new(
        release_id: impl Into<String>,
        build_time: DateTime<Utc>,
        files: BTreeMap<String, FileInfo>,
    ) -> Self {
        Self {
            files,
            release_id: release_id.into(),
            build_time: Some(build_time),
        }
    }

    /// Empty manifest standing in for "nothing deployed yet"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<String, FileInfo> {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&FileInfo> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn release_id(&self) -> &str {
        &self.release_id
    }

    pub fn build_time(&self) -> Option<DateTime<Utc>> {
        self.build_time
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes; saturates on absurd remote manifests
    pub fn total_size(&self) -> u64 {
        self.files
            .values()
            .fold(0u64, |total, info| total.saturating_add(info.size))
    }
}
