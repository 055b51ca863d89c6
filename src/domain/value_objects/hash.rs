//! Content Hash Value Object
//!
//! A validated, immutable SHA-256 digest of a file's content.
//! Used for change detection between build manifests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};

/// Content hash value object
///
/// Wraps a lowercase hex SHA-256 digest (64 characters, no prefix).
/// Serialized as a plain string, matching the `sha256` field of
/// `build-manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix accepted (and stripped) on input
    pub const PREFIX: &'static str = "sha256:";

    /// Create a ContentHash from a hex digest, with or without the `sha256:` prefix
    pub fn new(hex: &str) -> Self {
        let hex = hex.strip_prefix(Self::PREFIX).unwrap_or(hex);
        Self(hex.to_ascii_lowercase())
    }

    /// Create a ContentHash by computing SHA-256 of bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(content)))
    }

    /// Stream a reader through SHA-256, returning the digest and byte count
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<(Self, u64)> {
        let mut hasher = Sha256::new();
        let size = io::copy(reader, &mut hasher)?;
        Ok((Self(format!("{:x}", hasher.finalize())), size))
    }

    /// Get the hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display (first 12 hex chars)
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    /// Check if this hash matches another
    pub fn matches(&self, other: &ContentHash) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentHash {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
