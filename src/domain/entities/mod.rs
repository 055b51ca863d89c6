//! Domain Entities
//!
//! - `Manifest` - content-addressed snapshot of a build
//! - `Release` - a release directory on a target

mod manifest;
mod release;

pub use manifest::{FileInfo, Manifest};
pub use release::{sort_newest_first, Release};
