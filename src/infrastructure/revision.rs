//! Git revision lookup

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::domain::ports::RevisionSource;

/// `git rev-parse --short HEAD`, optionally in a specific directory
#[derive(Debug, Clone, Default)]
pub struct GitRevision {
    dir: Option<PathBuf>,
}

impl GitRevision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl RevisionSource for GitRevision {
    fn short_revision(&self) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(["rev-parse", "--short", "HEAD"])
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().ok()?;
        if !output.status.success() {
            return None;
        }
        let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!rev.is_empty()).then_some(rev)
    }
}
