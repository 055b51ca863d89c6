//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_events;
pub mod deployer;
pub mod revision;
pub mod site_builder;

pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use deployer::{DeployLock, Deployer};
pub use revision::{NoRevision, RevisionSource};
pub use site_builder::SiteBuilder;
