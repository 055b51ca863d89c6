//! Parallel manifest builder.
//!
//! A fixed pool of scoped worker threads drains a bounded queue of relative
//! paths. Each worker hashes outside any lock and takes the map mutex only to
//! insert. The first I/O error is kept in a one-slot channel; later errors are
//! dropped and workers keep draining so the producer never blocks forever.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Mutex;
use std::thread;

use chrono::Utc;
use tracing::{debug, trace};

use crate::domain::entities::{FileInfo, Manifest};
use crate::domain::value_objects::{ContentHash, MANIFEST_FILE};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::{join_key, walk_files};

/// Hashing workers used for deploys, independent of CPU count
pub const DEFAULT_WORKERS: usize = 11;

/// Builds a [`Manifest`] for a directory tree
#[derive(Debug, Clone, Copy)]
pub struct ManifestBuilder {
    workers: usize,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }

    /// One worker per available CPU
    pub fn per_cpu() -> Self {
        let cpus = thread::available_parallelism().map_or(1, |n| n.get());
        Self::new().with_workers(cpus)
    }

    /// Set the worker count (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Hash every regular file under `root` except the manifest file itself.
    ///
    /// Reads only; writing the result is a separate step.
    pub fn build(&self, root: &Path, release_id: &str) -> DeployResult<Manifest> {
        let build_time = Utc::now();
        let files: Vec<String> = walk_files(root)
            .map_err(|source| DeployError::Hash {
                path: root.to_path_buf(),
                source,
            })?
            .into_iter()
            .filter(|path| path != MANIFEST_FILE)
            .collect();

        debug!(
            root = %root.display(),
            files = files.len(),
            workers = self.workers,
            "hashing build output"
        );

        let files = self.hash_all(root, files)?;
        Ok(Manifest::new(release_id, build_time, files))
    }

    /// Hash `files` (keys under `root`) on the worker pool.
    ///
    /// The first failure is returned once every queued path has been taken.
    fn hash_all(&self, root: &Path, files: Vec<String>) -> DeployResult<BTreeMap<String, FileInfo>> {
        let results = Mutex::new(BTreeMap::new());
        let (err_tx, err_rx) = mpsc::sync_channel::<DeployError>(1);
        let (work_tx, work_rx) = mpsc::sync_channel::<String>(self.workers * 2);
        let work_rx = Mutex::new(work_rx);

        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| worker(root, &work_rx, &results, &err_tx));
            }
            for path in files {
                if work_tx.send(path).is_err() {
                    break;
                }
            }
            drop(work_tx);
        });

        if let Ok(err) = err_rx.try_recv() {
            return Err(err);
        }

        Ok(results
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

fn worker(
    root: &Path,
    queue: &Mutex<Receiver<String>>,
    results: &Mutex<BTreeMap<String, FileInfo>>,
    errors: &SyncSender<DeployError>,
) {
    loop {
        let next = match queue.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => return,
        };
        let Ok(rel) = next else {
            return;
        };

        match hash_file(root, &rel) {
            Ok(info) => {
                trace!(path = %rel, hash = info.sha256.short(), "hashed");
                if let Ok(mut map) = results.lock() {
                    map.insert(rel, info);
                }
            }
            Err(err) => {
                // Slot already taken: first error wins.
                let _ = errors.try_send(err);
            }
        }
    }
}

fn hash_file(root: &Path, rel: &str) -> DeployResult<FileInfo> {
    let path = join_key(root, rel).map_err(|source| DeployError::Hash {
        path: PathBuf::from(rel),
        source,
    })?;
    let hash_err = |source| DeployError::Hash {
        path: path.clone(),
        source,
    };
    let mut file = File::open(&path).map_err(hash_err)?;
    let (sha256, size) = ContentHash::from_reader(&mut file).map_err(hash_err)?;
    Ok(FileInfo::new(sha256, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn site(dir: &Path) {
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        fs::write(dir.join("css/site.css"), "body{}").unwrap();
        fs::write(dir.join(MANIFEST_FILE), "{}").unwrap();
    }

    #[test]
    fn hashes_every_file_but_the_manifest() {
        let dir = tempdir().unwrap();
        site(dir.path());

        let manifest = ManifestBuilder::new().build(dir.path(), "r1").unwrap();

        assert_eq!(manifest.len(), 2);
        assert!(!manifest.contains(MANIFEST_FILE));
        assert_eq!(manifest.release_id(), "r1");
        let css = manifest.get("css/site.css").unwrap();
        assert_eq!(css.size, 6);
        assert_eq!(css.sha256, ContentHash::from_bytes(b"body{}"));
    }

    #[test]
    fn nested_manifest_name_is_hashed() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join(MANIFEST_FILE), "x").unwrap();

        let manifest = ManifestBuilder::new().build(dir.path(), "r1").unwrap();

        assert!(manifest.contains("docs/build-manifest.json"));
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let dir = tempdir().unwrap();
        for i in 0..50 {
            fs::write(dir.path().join(format!("f{:02}.txt", i)), i.to_string()).unwrap();
        }

        let one = ManifestBuilder::new().with_workers(1).build(dir.path(), "r").unwrap();
        let many = ManifestBuilder::new().with_workers(16).build(dir.path(), "r").unwrap();

        assert_eq!(one.files(), many.files());
        assert_eq!(one.len(), 50);
    }

    #[test]
    fn empty_directory_gives_empty_manifest() {
        let dir = tempdir().unwrap();
        let manifest = ManifestBuilder::new().build(dir.path(), "r").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn missing_root_is_hash_error() {
        let dir = tempdir().unwrap();
        let err = ManifestBuilder::new()
            .build(&dir.path().join("public"), "r")
            .unwrap_err();
        assert!(matches!(err, DeployError::Hash { .. }));
    }

    #[test]
    fn failed_reads_fail_the_build_without_stalling() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("open.txt"), "ok").unwrap();
        fs::create_dir(dir.path().join("was-a-file")).unwrap();

        // Paths that vanished or became directories after the walk.
        let mut files: Vec<String> = (0..300).map(|i| format!("gone{:03}.txt", i)).collect();
        files.push("was-a-file".to_string());
        files.push("open.txt".to_string());

        let err = ManifestBuilder::new()
            .with_workers(3)
            .hash_all(dir.path(), files)
            .unwrap_err();

        assert!(matches!(err, DeployError::Hash { .. }), "{}", err);
    }

    #[test]
    fn non_utf8_file_name_is_hash_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"\xff.bin")), "x").unwrap();

        let err = ManifestBuilder::new().build(dir.path(), "r").unwrap_err();

        match err {
            DeployError::Hash { source, .. } => {
                assert!(source.to_string().contains(".bin"), "{}", source)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn zero_workers_is_clamped() {
        assert_eq!(ManifestBuilder::new().with_workers(0).workers(), 1);
        assert!(ManifestBuilder::per_cpu().workers() >= 1);
    }
}
