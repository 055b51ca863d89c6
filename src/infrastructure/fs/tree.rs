//! Directory-tree helpers shared by the manifest builder and the deployers.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

/// Every regular file under `root`, relative, `/`-separated, sorted.
///
/// Hidden files and ignore files are not special: a static build ships
/// whatever the builder produced. Symlinks are not followed. A file name
/// that is not valid UTF-8 cannot be a manifest key and fails the walk.
pub fn walk_files(root: &Path) -> io::Result<Vec<String>> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| io::Error::other(e.to_string()))?;
        files.push(relative_key(rel).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file name is not valid UTF-8: {}", entry.path().display()),
            )
        })?);
    }
    files.sort();
    Ok(files)
}

/// Manifest key for a relative path: components joined with `/`.
///
/// `None` when a component is not valid UTF-8.
pub fn relative_key(rel: &Path) -> Option<String> {
    let parts = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Resolve a manifest key under `base`, rejecting keys that would escape it.
pub fn join_key(base: &Path, key: &str) -> io::Result<PathBuf> {
    let rel = Path::new(key);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if key.is_empty() || escapes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing path outside the release: {}", key),
        ));
    }
    Ok(base.join(rel))
}

/// Recreate `src` at `dst` with every regular file hardlinked.
///
/// Equivalent to `cp -al src dst`: directories are new (with the source
/// permissions), file data is shared, symlinks are copied as links. `dst`
/// must not exist.
pub fn hardlink_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            hardlink_tree(&from, &to)?;
        } else if file_type.is_symlink() {
            std::os::unix::fs::symlink(fs::read_link(&from)?, &to)?;
        } else {
            fs::hard_link(&from, &to)?;
        }
    }
    fs::set_permissions(dst, fs::metadata(src)?.permissions())
}

/// Copy `src` over `dst`, breaking any hardlink `dst` shares.
///
/// The old entry is unlinked and a fresh inode created, so files sharing the
/// old inode (the previous release) are untouched. Mode and modification
/// time follow the source. Returns bytes copied.
pub fn copy_replacing(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let bytes = fs::copy(src, dst)?;
    let modified = fs::metadata(src)?.modified()?;
    // Read-only handle: the copied mode may not allow writing.
    fs::File::open(dst)?.set_modified(modified)?;
    Ok(bytes)
}

/// Remove a directory tree; a missing directory is not an error.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
