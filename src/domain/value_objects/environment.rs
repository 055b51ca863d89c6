//! Deployment environment value object.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deployment target descriptor, created from configuration and read-only
/// for the duration of a deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (local, staging, prod)
    pub name: String,
    /// SSH destination (`user@host`); empty for a local deploy
    #[serde(default)]
    pub target: String,
    /// Base directory holding `releases/` and `current`
    pub path: PathBuf,
    /// Number of releases to retain
    #[serde(default = "default_keep_n", alias = "keepN")]
    pub keep_n: usize,
    /// Base URL handed to the site builder
    #[serde(default, alias = "baseURL")]
    pub base_url: String,
    /// URL fetched on the remote host by the health check; remote
    /// environments fall back to [`Environment::DEFAULT_HEALTH_URL`]
    #[serde(default, alias = "healthURL")]
    pub health_url: Option<String>,
}

fn default_keep_n() -> usize {
    Environment::DEFAULT_KEEP_N
}

impl Environment {
    pub const DEFAULT_KEEP_N: usize = 3;
    pub const DEFAULT_HEALTH_URL: &'static str = "http://localhost/healthz.json";

    pub fn local(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            target: String::new(),
            path: path.into(),
            keep_n: Self::DEFAULT_KEEP_N,
            base_url: String::new(),
            health_url: None,
        }
    }

    pub fn remote(
        name: impl Into<String>,
        target: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target: target.into(),
            ..Self::local(name, path)
        }
    }

    pub fn with_keep_n(mut self, keep_n: usize) -> Self {
        self.keep_n = keep_n;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_health_url(mut self, url: impl Into<String>) -> Self {
        self.health_url = Some(url.into());
        self
    }

    /// URL the remote health check fetches on the host; `None` for local
    /// environments, which read `current/healthz.json` directly
    pub fn remote_health_url(&self) -> Option<&str> {
        if self.is_local() {
            return None;
        }
        Some(
            self.health_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(Self::DEFAULT_HEALTH_URL),
        )
    }

    pub fn is_local(&self) -> bool {
        self.target.trim().is_empty()
    }

    /// Human-readable target, e.g. `local (./deploy)` or `user@host:/var/www`
    pub fn describe(&self) -> String {
        if self.is_local() {
            format!("local ({})", self.path.display())
        } else {
            format!("{}:{}", self.target, self.path.display())
        }
    }
}
