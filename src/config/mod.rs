//! Configuration module for relink
//!
//! `deploy.toml` is looked up in this order:
//! 1. `--config PATH` (highest priority; must exist)
//! 2. `deploy.toml` in the working directory or any parent
//! 3. User config (`~/.config/relink/deploy.toml`)
//! 4. Built-in defaults (lowest priority)
//!
//! Environments missing from the file are filled in from the defaults.

mod loader;
mod types;

pub use loader::{
    environment_name, find_config_file, resolve, user_config_path, ConfigWarning, LoadedConfig,
    CONFIG_FILE, DEFAULT_ENVIRONMENT, ENV_VAR,
};
pub use types::{default_environments, BuildConfig, Config, EXAMPLE_CONFIG};
