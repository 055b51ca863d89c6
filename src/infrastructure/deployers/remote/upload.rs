//! Streamed tar+gzip upload.
//!
//! The archive is written entry by entry straight into the remote process's
//! stdin, so memory use is bounded by the compressor regardless of payload
//! size; pipe backpressure paces the producer.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::Child;
use std::thread;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::join_key;

/// Write a gzip-compressed tar of `files` (relative to `build_dir`) into
/// `writer`. Entries keep the source mode and modification time.
///
/// Fails on the first file that cannot be read. Returns uncompressed bytes.
pub fn write_archive<W: Write>(writer: W, build_dir: &Path, files: &[String]) -> io::Result<u64> {
    let mut builder = tar::Builder::new(GzEncoder::new(writer, Compression::default()));
    let mut total = 0;

    for file in files {
        let src = join_key(build_dir, file)?;
        let size = std::fs::metadata(&src)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", file, e)))?
            .len();
        builder
            .append_path_with_name(&src, file)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", file, e)))?;
        total += size;
    }

    builder.into_inner()?.finish()?.flush()?;
    Ok(total)
}

/// Stream `files` into a running extraction process and wait for it.
pub fn stream_to(mut child: Child, build_dir: &Path, files: &[String]) -> DeployResult<u64> {
    let stderr = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let written = match child.stdin.take() {
        Some(stdin) => write_archive(stdin, build_dir, files),
        None => Err(io::Error::other("upload process has no stdin")),
    };

    // A local read failure must not leave a half-fed extractor running.
    if written.is_err() {
        let _ = child.kill();
    }
    let status = child
        .wait()
        .map_err(|e| DeployError::transport("upload", e.to_string()))?;
    let remote_err = stderr
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    match written {
        Ok(bytes) if status.success() => {
            debug!(files = files.len(), bytes, "upload complete");
            Ok(bytes)
        }
        Ok(_) => Err(DeployError::transport(
            "upload",
            failure(&remote_err, &status.to_string()),
        )),
        // Broken pipe means the remote side died first; its stderr says why.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe && !status.success() => Err(
            DeployError::transport("upload", failure(&remote_err, &status.to_string())),
        ),
        Err(e) => Err(DeployError::Io(e)),
    }
}

fn failure(stderr: &str, status: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status.to_string()
    } else {
        stderr.to_string()
    }
}
