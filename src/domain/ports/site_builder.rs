//! Site Builder Port
//!
//! The external static-site generator run before hashing.

use crate::domain::value_objects::ReleaseId;
use crate::error::DeployResult;

/// Produces the build output directory
pub trait SiteBuilder {
    /// Shown in progress output
    fn describe(&self) -> String;

    /// Build the site for `release_id`, optionally against `base_url`.
    ///
    /// Failure is a `DeployError::Build`.
    fn build(&self, release_id: &ReleaseId, base_url: Option<&str>) -> DeployResult<()>;
}

impl<T: SiteBuilder + ?Sized> SiteBuilder for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn build(&self, release_id: &ReleaseId, base_url: Option<&str>) -> DeployResult<()> {
        (**self).build(release_id, base_url)
    }
}
