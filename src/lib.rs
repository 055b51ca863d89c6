//! relink - atomic, delta-aware static site deploys
//!
//! Every deploy becomes an immutable release directory, cloned from the live
//! release with hardlinks so unchanged files cost neither transfer nor disk.
//! Only files whose SHA-256 digest changed are uploaded, and the release goes
//! live by atomically renaming a `current` symlink. The same lifecycle runs
//! against the local filesystem or a remote host over SSH.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase, ReleasesUseCase};
pub use config::Config;
pub use domain::entities::{FileInfo, Manifest, Release};
pub use domain::ports::Deployer;
pub use domain::services::{compute_delta, Delta};
pub use domain::value_objects::{Environment, ReleaseId};
pub use error::{DeployError, DeployResult, DeployWarning};
pub use infrastructure::{LocalDeployer, ManifestBuilder, RemoteDeployer};
