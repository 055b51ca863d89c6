//! relink CLI - atomic, delta-aware static site deploys
//!
//! Usage: relink [COMMAND] [ENV]
//!
//! Commands:
//!   deploy    Build, upload the delta and activate a new release (default)
//!   list      List releases on an environment
//!   rollback  Point `current` back at an earlier release
//!   status    Show the live release and its health payload
//!   manifest  Write build-manifest.json without deploying

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::warn;

use relink::application::{generate_manifest, DeployOptions};
use relink::config::{self, LoadedConfig, EXAMPLE_CONFIG};
use relink::domain::ports::{DeployEventSink, RevisionSource};
use relink::domain::value_objects::{Environment, ReleaseId};
use relink::error::DeployError;
use relink::infrastructure::{ConsoleEventSink, GitRevision, JsonEventSink, ManifestBuilder};
use relink::presentation::cli::{Cli, Commands, DeployArgs};
use relink::presentation::output::{self, OutputFormat};
use relink::presentation::{factory, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if is_config_error(&err) {
                eprintln!();
                eprintln!("Create a deploy.toml in your project root:");
                eprintln!();
                eprint!("{}", EXAMPLE_CONFIG);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let format = OutputFormat::from_json_flag(cli.json);
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let loaded = config::resolve(cli.config.as_deref(), &cwd)?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    match cli.command() {
        Commands::Deploy(args) => cmd_deploy(&loaded, &args, cli.json),
        Commands::List { env } => cmd_list(&loaded, env.as_deref(), format),
        Commands::Rollback { env, release } => {
            cmd_rollback(&loaded, env.as_deref(), release.as_ref(), format)
        }
        Commands::Status { env } => cmd_status(&loaded, env.as_deref(), format),
        Commands::Manifest { dir, release } => {
            let dir = dir.unwrap_or_else(|| loaded.config.build.output_dir.clone());
            cmd_manifest(&dir, release, format)
        }
    }
}

fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<DeployError>().map(DeployError::root),
            Some(DeployError::Config { .. })
        )
    })
}

fn environment(loaded: &LoadedConfig, name: Option<&str>) -> Result<Environment> {
    let name = config::environment_name(name, std::env::var(config::ENV_VAR).ok());
    Ok(loaded.config.environment(&name)?.clone())
}

fn cmd_deploy(loaded: &LoadedConfig, args: &DeployArgs, json: bool) -> Result<()> {
    let env = environment(loaded, args.env.as_deref())?;
    let build = &loaded.config.build;
    let options = DeployOptions::new(factory::build_dir(build, args.build_dir.clone()))
        .with_release_id(args.release.clone())
        .with_dry_run(args.dry_run)
        .with_full(args.full)
        .with_no_build(args.no_build);

    let sink: Arc<dyn DeployEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout())
    };

    let use_case = factory::create_deploy_use_case(&env, build);
    use_case
        .execute_with_events(&env, &options, sink)
        .with_context(|| format!("deploy to {} failed", env.name))?;
    Ok(())
}

fn cmd_list(loaded: &LoadedConfig, env: Option<&str>, format: OutputFormat) -> Result<()> {
    let env = environment(loaded, env)?;
    let use_case = factory::create_releases_use_case(&env);
    let releases = use_case.list()?;

    let mut out = io::stdout().lock();
    output::render_releases(&mut out, format, &use_case.describe(), &releases)?;
    out.flush()?;
    Ok(())
}

fn cmd_rollback(
    loaded: &LoadedConfig,
    env: Option<&str>,
    release: Option<&ReleaseId>,
    format: OutputFormat,
) -> Result<()> {
    let env = environment(loaded, env)?;
    let use_case = factory::create_releases_use_case(&env);
    let id = use_case
        .rollback(release)
        .with_context(|| format!("rollback on {} failed", env.name))?;

    let mut out = io::stdout().lock();
    output::render_rollback(&mut out, format, &env, &id)?;
    out.flush()?;
    Ok(())
}

fn cmd_status(loaded: &LoadedConfig, env: Option<&str>, format: OutputFormat) -> Result<()> {
    let env = environment(loaded, env)?;
    let use_case = factory::create_releases_use_case(&env);
    let status = use_case.status()?;

    let mut out = io::stdout().lock();
    output::render_status(&mut out, format, &env, &use_case.describe(), &status)?;
    out.flush()?;
    Ok(())
}

fn cmd_manifest(dir: &Path, release: Option<ReleaseId>, format: OutputFormat) -> Result<()> {
    let release = release.unwrap_or_else(|| {
        ReleaseId::generate(Utc::now(), GitRevision::new().short_revision().as_deref())
    });
    let generated = generate_manifest(dir, release.as_str(), &ManifestBuilder::per_cpu())
        .with_context(|| format!("cannot generate manifest for {}", dir.display()))?;

    let mut out = io::stdout().lock();
    output::render_manifest(&mut out, format, &generated)?;
    out.flush()?;
    Ok(())
}
