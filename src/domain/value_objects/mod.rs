//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod environment;
mod hash;
mod layout;
mod release_id;

pub use environment::Environment;
pub use hash::ContentHash;
pub use layout::{ReleaseLayout, HEALTH_FILE, MANIFEST_FILE, REQUIRED_FILES};
pub use release_id::ReleaseId;
