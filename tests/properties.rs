//! Property tests for relink.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "round-trips".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/delta.rs"]
mod delta;

#[path = "properties/manifest.rs"]
mod manifest;

#[path = "properties/release_id.rs"]
mod release_id;

#[path = "properties/retention.rs"]
mod retention;
