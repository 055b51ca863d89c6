//! Deployer implementations

mod local;
pub mod remote;

pub use local::LocalDeployer;
pub use remote::{LocalShell, RemoteDeployer, RemoteShell, SshShell};
