//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Build, hash, diff, release, activate, clean up
//! - `ReleasesUseCase` - List, roll back, report status
//! - `generate_manifest` - Write a build manifest without deploying

pub mod deploy;
pub mod manifest;
pub mod releases;

pub use deploy::{DeployOptions, DeployReport, DeployUseCase, UploadKind};
pub use manifest::{generate_manifest, GeneratedManifest};
pub use releases::{pretty_payload, ReleasesUseCase, StatusReport};
