//! Configuration type definitions

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Environment;
use crate::error::{DeployError, DeployResult};

use super::loader::{self, ConfigWarning};

/// Example `deploy.toml`, printed when configuration cannot be loaded
pub const EXAMPLE_CONFIG: &str = r#"[build]
command = ["hugo", "--minify"]
output_dir = "public"
base_url_flag = "--baseURL"

[[environments]]
name = "local"
path = "./deploy"
keep_n = 3
base_url = "http://localhost:1314"

[[environments]]
name = "prod"
target = "deploy@example.org"
path = "/var/www/site"
keep_n = 5
base_url = "https://example.org"
health_url = "http://localhost/healthz.json"
"#;

/// External site builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Program and arguments; empty means the site must be built elsewhere
    pub command: Vec<String>,
    /// Build root that gets hashed and uploaded
    pub output_dir: PathBuf,
    /// Flag the environment's base URL is passed with
    pub base_url_flag: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: vec!["hugo".to_string(), "--minify".to_string()],
            output_dir: PathBuf::from("public"),
            base_url_flag: Some("--baseURL".to_string()),
        }
    }
}

/// `deploy.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            environments: default_environments(),
        }
    }
}

/// Environments available without any configuration file
pub fn default_environments() -> Vec<Environment> {
    vec![
        Environment::local("local", "./deploy")
            .with_keep_n(3)
            .with_base_url("http://localhost:1314"),
        Environment::remote("prod", "deploy@example.org", "/var/www/site")
            .with_keep_n(5)
            .with_base_url("https://example.org")
            .with_health_url(Environment::DEFAULT_HEALTH_URL),
    ]
}

impl Config {
    /// Load configuration from a TOML file, discarding warnings
    pub fn load(path: &Path) -> DeployResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Add built-in environments whose names the file does not define
    pub fn with_default_environments(mut self) -> Self {
        for default in default_environments() {
            if !self.environments.iter().any(|env| env.name == default.name) {
                self.environments.push(default);
            }
        }
        self
    }

    /// Look up an environment by name
    pub fn environment(&self, name: &str) -> DeployResult<&Environment> {
        self.environments
            .iter()
            .find(|env| env.name == name)
            .ok_or_else(|| DeployError::UnknownEnvironment {
                name: name.to_string(),
                available: self.environment_names().join(", "),
            })
    }

    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.iter().map(|env| env.name.as_str()).collect()
    }

    /// Reject configurations a deploy cannot run against
    pub fn validate(&self) -> DeployResult<()> {
        let mut seen = HashSet::new();
        for env in &self.environments {
            let name = env.name.trim();
            if name.is_empty() {
                return Err(DeployError::config("environment with an empty name"));
            }
            if !seen.insert(name) {
                return Err(DeployError::config(format!(
                    "environment '{}' is defined twice",
                    name
                )));
            }
            if env.path.as_os_str().is_empty() {
                return Err(DeployError::config(format!(
                    "environment '{}' has no path",
                    name
                )));
            }
            if env.keep_n == 0 {
                return Err(DeployError::config(format!(
                    "environment '{}': keep_n must be at least 1",
                    name
                )));
            }
            if env.target.contains(char::is_whitespace) {
                return Err(DeployError::config(format!(
                    "environment '{}': target must not contain whitespace",
                    name
                )));
            }
            if env.target.starts_with('-') {
                return Err(DeployError::config(format!(
                    "environment '{}': target must not start with '-'",
                    name
                )));
            }
        }
        if self.build.output_dir.as_os_str().is_empty() {
            return Err(DeployError::config("build.output_dir must not be empty"));
        }
        Ok(())
    }
}
