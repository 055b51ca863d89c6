//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//! - Logging initialisation
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Renderers for list, rollback, status and manifest
//! - `logging` - tracing subscriber setup
//!
//! ## Usage
//!
//! ```ignore
//! use relink::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case(&env, &config.build);
//! let report = use_case.execute(&env, &options)?;
//! ```

pub mod cli;
pub mod factory;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, DeployArgs};
pub use factory::{create_deploy_use_case, create_deployer, create_releases_use_case};
pub use output::OutputFormat;
