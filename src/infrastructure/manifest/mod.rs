//! Build manifest generation and storage

mod builder;
mod store;

pub use builder::{ManifestBuilder, DEFAULT_WORKERS};
pub use store::{parse_manifest, read_manifest, to_json, write_manifest};
