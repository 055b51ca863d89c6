//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::PathBuf;

use crate::application::{DeployUseCase, ReleasesUseCase};
use crate::config::BuildConfig;
use crate::domain::ports::Deployer;
use crate::domain::value_objects::Environment;
use crate::infrastructure::{CommandSiteBuilder, GitRevision, LocalDeployer, RemoteDeployer};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<Box<dyn Deployer>, CommandSiteBuilder, GitRevision>;

/// Type alias for the concrete ReleasesUseCase
pub type ConcreteReleasesUseCase = ReleasesUseCase<Box<dyn Deployer>>;

/// Backend for an environment: local filesystem when it has no target,
/// SSH otherwise
pub fn create_deployer(env: &Environment) -> Box<dyn Deployer> {
    if env.is_local() {
        Box::new(LocalDeployer::new(env.path.clone()))
    } else {
        Box::new(create_remote_deployer(env))
    }
}

/// SSH deployer probing the environment's health URL on the host
pub fn create_remote_deployer(env: &Environment) -> RemoteDeployer {
    RemoteDeployer::ssh(env.target.clone(), env.path.clone())
        .with_health_url(env.remote_health_url().map(str::to_string))
}

/// Site builder configured by the `[build]` table
pub fn create_site_builder(build: &BuildConfig) -> CommandSiteBuilder {
    CommandSiteBuilder::new(build.command.clone())
        .with_base_url_flag(build.base_url_flag.clone())
}

/// Create a deploy use case with all dependencies wired up
pub fn create_deploy_use_case(env: &Environment, build: &BuildConfig) -> ConcreteDeployUseCase {
    DeployUseCase::new(
        create_deployer(env),
        create_site_builder(build),
        GitRevision::new(),
    )
}

/// Create a releases use case (list, rollback, status) for an environment
pub fn create_releases_use_case(env: &Environment) -> ConcreteReleasesUseCase {
    ReleasesUseCase::new(create_deployer(env))
}

/// Build output directory: explicit override, else `[build].output_dir`
pub fn build_dir(build: &BuildConfig, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| build.output_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_environment_gets_local_deployer() {
        let deployer = create_deployer(&Environment::local("local", "./deploy"));
        assert_eq!(deployer.describe(), "local (./deploy)");
    }

    #[test]
    fn remote_environment_gets_ssh_deployer() {
        let env = Environment::remote("prod", "deploy@example.org", "/var/www/site");
        let deployer = create_deployer(&env);
        assert_eq!(deployer.describe(), "deploy@example.org:/var/www/site");
    }

    #[test]
    fn remote_deployer_fetches_default_health_url() {
        let env = Environment::remote("prod", "deploy@example.org", "/var/www/site");
        let deployer = create_remote_deployer(&env);
        assert_eq!(deployer.health_url(), Some("http://localhost/healthz.json"));
    }

    #[test]
    fn build_dir_prefers_explicit_override() {
        let build = BuildConfig::default();
        assert_eq!(build_dir(&build, None), PathBuf::from("public"));
        assert_eq!(
            build_dir(&build, Some(PathBuf::from("dist"))),
            PathBuf::from("dist")
        );
    }
}
