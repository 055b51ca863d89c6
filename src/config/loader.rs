//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DeployError, DeployResult};

use super::types::Config;

/// Configuration file name searched for in the working tree
pub const CONFIG_FILE: &str = "deploy.toml";

/// Environment variable naming the default environment
pub const ENV_VAR: &str = "RELINK_ENV";

/// Environment used when neither the command line nor `RELINK_ENV` names one
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Configuration together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was read from; `None` for built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
///
/// Environments the file does not define are filled in from the built-in
/// defaults, and the merged result is validated.
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| {
        DeployError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::config(format!("{}: {}", path.display(), e)))?;

    let config = config.with_default_environments();
    config.validate()?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve configuration in lookup order:
///
/// 1. `explicit` path (must exist)
/// 2. `deploy.toml` in `cwd` or any parent
/// 3. `<user config dir>/relink/deploy.toml`
/// 4. Built-in defaults
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> DeployResult<LoadedConfig> {
    let source = match explicit {
        Some(path) if !path.is_file() => {
            return Err(DeployError::config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(cwd).or_else(|| user_config_path().filter(|p| p.is_file())),
    };

    match source {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let (config, warnings) = load_with_warnings(&path)?;
            Ok(LoadedConfig {
                config,
                source: Some(path),
                warnings,
            })
        }
        None => {
            debug!("no configuration file, using defaults");
            Ok(LoadedConfig {
                config: Config::default(),
                source: None,
                warnings: Vec::new(),
            })
        }
    }
}

/// Search `start` and its parents for `deploy.toml`
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// `~/.config/relink/deploy.toml` (platform equivalent)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("relink").join(CONFIG_FILE))
}

/// Environment name from the command line, then `RELINK_ENV`, then `local`
pub fn environment_name(cli: Option<&str>, from_env: Option<String>) -> String {
    cli.map(str::to_string)
        .or_else(|| from_env.filter(|name| !name.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "build",
        "command",
        "output_dir",
        "base_url_flag",
        "environments",
        "name",
        "target",
        "path",
        "keep_n",
        "base_url",
        "health_url",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
