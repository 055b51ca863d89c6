//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod delta;
mod retention;

pub use delta::{compute_delta, delta_size, Delta};
pub use retention::{releases_to_prune, select_rollback_target};
