//! Manifest-only generation
//!
//! Hashes a build directory and writes `build-manifest.json` into it without
//! touching any deploy target.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::Manifest;
use crate::domain::value_objects::MANIFEST_FILE;
use crate::error::DeployResult;
use crate::infrastructure::manifest::{write_manifest, ManifestBuilder};

/// Manifest written by [`generate_manifest`]
#[derive(Debug, Clone)]
pub struct GeneratedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Hash `build_dir` and write its manifest to `build_dir/build-manifest.json`
pub fn generate_manifest(
    build_dir: &Path,
    release_id: &str,
    builder: &ManifestBuilder,
) -> DeployResult<GeneratedManifest> {
    let manifest = builder.build(build_dir, release_id)?;
    let path = build_dir.join(MANIFEST_FILE);
    write_manifest(&manifest, &path)?;
    debug!(path = %path.display(), files = manifest.len(), "manifest written");
    Ok(GeneratedManifest { path, manifest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::manifest::read_manifest;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_manifest_next_to_build_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "hello").unwrap();

        let generated =
            generate_manifest(dir.path(), "manual", &ManifestBuilder::new()).unwrap();

        assert_eq!(generated.path, dir.path().join(MANIFEST_FILE));
        assert_eq!(read_manifest(&generated.path).unwrap(), generated.manifest);
        assert_eq!(generated.manifest.release_id(), "manual");
        assert_eq!(generated.manifest.total_size(), 5);
    }

    #[test]
    fn regenerating_ignores_previous_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "hello").unwrap();
        let builder = ManifestBuilder::new();

        let first = generate_manifest(dir.path(), "one", &builder).unwrap();
        let second = generate_manifest(dir.path(), "two", &builder).unwrap();

        assert_eq!(first.manifest.files(), second.manifest.files());
    }
}
