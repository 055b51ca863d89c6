//! Deploy Module
//!
//! Orchestrates one atomic, delta-aware release.
//!
//! ## Structure
//!
//! - `options` - Per-invocation overrides (`DeployOptions`)
//! - `result` - Outcome of a deploy (`DeployReport`)
//! - `use_case` - The release state machine (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use relink::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(deployer, builder, GitRevision::new());
//! let report = use_case.execute(&env, &DeployOptions::new("public"))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployReport, UploadKind};
pub use use_case::DeployUseCase;
