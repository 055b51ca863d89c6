//! Command-driven site builder (hugo, zola, npm run build, ...)

use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::domain::ports::SiteBuilder;
use crate::domain::value_objects::ReleaseId;
use crate::error::{DeployError, DeployResult};

/// Environment variable carrying the release ID into the build
pub const RELEASE_ID_VAR: &str = "RELEASE_ID";

/// Runs a configured command with `RELEASE_ID` set
#[derive(Debug, Clone)]
pub struct CommandSiteBuilder {
    command: Vec<String>,
    base_url_flag: Option<String>,
    workdir: Option<PathBuf>,
}

impl CommandSiteBuilder {
    /// `command[0]` is the program, the rest its arguments
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            base_url_flag: None,
            workdir: None,
        }
    }

    /// Flag the environment's base URL is passed with, e.g. `--baseURL`
    pub fn with_base_url_flag(mut self, flag: Option<String>) -> Self {
        self.base_url_flag = flag.filter(|f| !f.is_empty());
        self
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Full argument vector for a build
    pub fn args(&self, base_url: Option<&str>) -> Vec<String> {
        let mut args = self.command.clone();
        if let (Some(flag), Some(url)) = (&self.base_url_flag, base_url) {
            if !url.is_empty() {
                args.push(flag.clone());
                args.push(url.to_string());
            }
        }
        args
    }
}

impl SiteBuilder for CommandSiteBuilder {
    fn describe(&self) -> String {
        self.command.join(" ")
    }

    fn build(&self, release_id: &ReleaseId, base_url: Option<&str>) -> DeployResult<()> {
        let args = self.args(base_url);
        let Some((program, rest)) = args.split_first() else {
            return Err(DeployError::Build {
                message: "no build command configured".to_string(),
            });
        };

        debug!(program = %program, args = ?rest, release = %release_id, "running build");
        let mut cmd = Command::new(program);
        cmd.args(rest)
            .env(RELEASE_ID_VAR, release_id.as_str())
            // Build chatter stays off stdout so `--json` output remains parseable.
            .stdout(io::stderr());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|e| DeployError::Build {
            message: format!("cannot run {}: {}", program, e),
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(DeployError::Build {
                message: format!("{} exited with {}", program, status),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn id() -> ReleaseId {
        ReleaseId::parse("20250101-120000").unwrap()
    }

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn base_url_is_appended_with_flag() {
        let builder = CommandSiteBuilder::new(strings(&["hugo", "--minify"]))
            .with_base_url_flag(Some("--baseURL".to_string()));
        assert_eq!(
            builder.args(Some("https://example.org")),
            ["hugo", "--minify", "--baseURL", "https://example.org"]
        );
        assert_eq!(builder.args(None), ["hugo", "--minify"]);
    }

    #[test]
    fn base_url_ignored_without_flag() {
        let builder = CommandSiteBuilder::new(strings(&["make"]));
        assert_eq!(builder.args(Some("https://example.org")), ["make"]);
    }

    #[test]
    fn release_id_is_exported() {
        let dir = tempdir().unwrap();
        let builder = CommandSiteBuilder::new(strings(&[
            "sh",
            "-c",
            "printf %s \"$RELEASE_ID\" > out.txt",
        ]))
        .with_workdir(dir.path());

        builder.build(&id(), None).unwrap();

        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "20250101-120000");
    }

    #[test]
    fn failing_command_is_build_error() {
        let builder = CommandSiteBuilder::new(strings(&["sh", "-c", "exit 2"]));
        let err = builder.build(&id(), None).unwrap_err();
        assert!(matches!(err, DeployError::Build { .. }));
    }

    #[test]
    fn missing_program_is_build_error() {
        let builder = CommandSiteBuilder::new(strings(&["relink-no-such-builder"]));
        assert!(matches!(
            builder.build(&id(), None),
            Err(DeployError::Build { .. })
        ));
        assert!(matches!(
            CommandSiteBuilder::new(Vec::new()).build(&id(), None),
            Err(DeployError::Build { .. })
        ));
    }
}
