//! Common test utilities for relink integration tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated project and home directories plus CLI helpers
//! - Fixtures: A minimal static site that passes release validation

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
