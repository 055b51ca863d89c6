//! `build-manifest.json` persistence.

use std::fs::Permissions;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::entities::Manifest;
use crate::error::{DeployError, DeployResult};

/// Serialize a manifest: two-space indented JSON with a trailing newline
pub fn to_json(manifest: &Manifest) -> DeployResult<String> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// Parse manifest JSON; `location` names the source in error messages
pub fn parse_manifest(content: &[u8], location: &str) -> DeployResult<Manifest> {
    serde_json::from_slice(content).map_err(|e| DeployError::ManifestParse {
        location: location.to_string(),
        message: e.to_string(),
    })
}

/// Write `manifest` to `path` atomically (temp file in the same directory,
/// then rename).
pub fn write_manifest(manifest: &Manifest, path: &Path) -> DeployResult<()> {
    let json = to_json(manifest)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    // Temp files are created 0600; the manifest ships with the site.
    tmp.as_file().set_permissions(Permissions::from_mode(0o644))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DeployError::Io(e.error))?;
    Ok(())
}

/// Read a manifest; a missing file is `ManifestNotFound`
pub fn read_manifest(path: &Path) -> DeployResult<Manifest> {
    let location = path.display().to_string();
    let content = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DeployError::ManifestNotFound {
            location: location.clone(),
        },
        _ => DeployError::Io(e),
    })?;
    parse_manifest(&content, &location)
}
