//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --json, --verbose) are inherited by all subcommands
//! - Running `relink` without a subcommand deploys the default environment

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::value_objects::ReleaseId;

/// relink - atomic, delta-aware static site deploys
#[derive(Parser, Debug)]
#[command(name = "relink")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Environments come from deploy.toml; RELINK_ENV picks the default.")]
pub struct Cli {
    /// Path to deploy.toml (default: search the working tree)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build, upload the delta and activate a new release
    Deploy(DeployArgs),

    /// List releases on an environment
    List {
        /// Environment name
        env: Option<String>,
    },

    /// Point `current` back at an earlier release
    Rollback {
        /// Environment name
        env: Option<String>,

        /// Release to activate (default: newest non-current release)
        #[arg(value_parser = ReleaseId::parse)]
        release: Option<ReleaseId>,
    },

    /// Show the live release and its health payload
    Status {
        /// Environment name
        env: Option<String>,
    },

    /// Write build-manifest.json without deploying
    Manifest {
        /// Build directory (default: build.output_dir from deploy.toml)
        dir: Option<PathBuf>,

        /// Release ID embedded in the manifest (default: generated)
        #[arg(long, value_parser = ReleaseId::parse)]
        release: Option<ReleaseId>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Environment name
    pub env: Option<String>,

    /// Release ID (default: UTC timestamp plus git revision)
    #[arg(long, value_parser = ReleaseId::parse)]
    pub release: Option<ReleaseId>,

    /// Show what would be deployed without touching the target
    #[arg(long)]
    pub dry_run: bool,

    /// Upload every file instead of the delta
    #[arg(long)]
    pub full: bool,

    /// Skip the site build and deploy the existing output directory
    #[arg(long)]
    pub no_build: bool,

    /// Build output directory (default: build.output_dir from deploy.toml)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run; a bare `relink` deploys with default flags
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Deploy(DeployArgs::default()))
    }
}
