//! Revision Source Port

/// Short source-control revision used to suffix generated release IDs
pub trait RevisionSource {
    /// `None` when no revision is available (not a repository, tool missing)
    fn short_revision(&self) -> Option<String>;
}

/// Revision source that never has a revision
pub struct NoRevision;

impl RevisionSource for NoRevision {
    fn short_revision(&self) -> Option<String> {
        None
    }
}
