//! Release identifier value object.
//!
//! Release IDs name directories under `releases/` and appear in remote shell
//! scripts and in the whitespace-separated output of the remote release
//! listing, so they are restricted to a conservative character set.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

/// Timestamp layout for generated IDs; sorts lexicographically by time.
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Filesystem-safe release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseId(String);

impl ReleaseId {
    /// Parse and validate a user-supplied release ID
    pub fn parse(id: &str) -> Result<Self, DeployError> {
        let invalid = |reason: &str| DeployError::InvalidReleaseId {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        if id.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if id == "." || id == ".." {
            return Err(invalid("must not be a relative directory name"));
        }
        if id.starts_with('-') {
            return Err(invalid("must not start with '-'"));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+')))
        {
            return Err(invalid(&format!("character '{}' is not allowed", c)));
        }

        Ok(Self(id.to_string()))
    }

    /// Generate `<UTC timestamp>-<short revision>`, or the timestamp alone
    /// when no revision is available
    pub fn generate(now: DateTime<Utc>, revision: Option<&str>) -> Self {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let revision = revision
            .map(str::trim)
            .filter(|rev| !rev.is_empty() && Self::parse(rev).is_ok());

        match revision {
            Some(rev) => Self(format!("{}-{}", timestamp, rev)),
            None => Self(timestamp),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReleaseId {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ReleaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
