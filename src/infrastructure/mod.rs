//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Tree walking, hardlink cloning, hardlink-breaking copies
//! - `manifest/` - Parallel manifest builder and JSON store
//! - `deployers/` - Local and remote (SSH) deployers
//! - `build/` - External site builder
//! - `events/` - Console and NDJSON event sinks

pub mod build;
pub mod deployers;
pub mod events;
pub mod fs;
pub mod manifest;
pub mod revision;

// Re-export for convenience
pub use build::CommandSiteBuilder;
pub use deployers::{LocalDeployer, LocalShell, RemoteDeployer, RemoteShell, SshShell};
pub use events::{ConsoleEventSink, JsonEventSink};
pub use manifest::{read_manifest, write_manifest, ManifestBuilder, DEFAULT_WORKERS};
pub use revision::GitRevision;
