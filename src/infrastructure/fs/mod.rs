//! File System Helpers
//!
//! Tree walking, hardlink cloning and hardlink-breaking copies.

mod tree;

pub use tree::{copy_replacing, hardlink_tree, join_key, relative_key, remove_tree, walk_files};
