//! Error types for relink
//!
//! Uses `thiserror` for library errors; the binary wraps them with `anyhow`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for relink operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Lifecycle stage a deploy was attempting when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Build,
    BuildManifest,
    FetchManifest,
    WriteManifest,
    Lock,
    CreateRelease,
    Upload,
    Activate,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Build => "build",
            Self::BuildManifest => "manifest generation",
            Self::FetchManifest => "fetch remote manifest",
            Self::WriteManifest => "write manifest",
            Self::Lock => "acquire deploy lock",
            Self::CreateRelease => "create release",
            Self::Upload => "upload",
            Self::Activate => "activate release",
        };
        f.write_str(name)
    }
}

/// Main error type for relink operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Missing or malformed environment configuration
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Environment name not present in the configuration
    #[error("unknown environment '{name}' (available: {available})")]
    UnknownEnvironment { name: String, available: String },

    /// External site builder failed
    #[error("build failed: {message}")]
    Build { message: String },

    /// A file under the build root could not be read while hashing
    #[error("cannot hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SSH connectivity or remote command failure
    #[error("{operation} failed on remote: {message}")]
    Transport { operation: String, message: String },

    /// Release is missing one of the required marker files
    #[error("validation failed: {missing} missing from release {release}")]
    Validation { release: String, missing: String },

    /// No manifest on the target (first deploy)
    #[error("no manifest found at {location}")]
    ManifestNotFound { location: String },

    /// Live health payload missing or does not carry the release ID
    #[error("health check failed: {message}")]
    Health { message: String },

    /// Manifest exists but is not valid JSON
    #[error("invalid manifest at {location}: {message}")]
    ManifestParse { location: String, message: String },

    /// A release directory with this ID already exists
    #[error("release {id} already exists")]
    ReleaseExists { id: String },

    /// Named release does not exist on the target
    #[error("release {id} not found")]
    ReleaseNotFound { id: String },

    /// Rollback requested without an explicit target and nothing to go back to
    #[error("no previous release found")]
    NoPreviousRelease,

    /// Release ID is not usable as a directory name
    #[error("invalid release id '{id}': {reason}")]
    InvalidReleaseId { id: String, reason: String },

    /// Another deploy holds the environment lock
    #[error("another deploy is in progress (lock held on {path})")]
    Locked { path: PathBuf },

    /// Failure at a specific lifecycle stage
    #[error("{stage}: {source}")]
    Stage {
        stage: DeployStage,
        #[source]
        source: Box<DeployError>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeployError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn health(message: impl Into<String>) -> Self {
        Self::Health {
            message: message.into(),
        }
    }

    /// Wrap this error with the stage it occurred in
    pub fn at(self, stage: DeployStage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The underlying error with stage wrappers removed
    pub fn root(&self) -> &DeployError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage the error was raised in, if it was wrapped
    pub fn stage(&self) -> Option<DeployStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// First deploy: nothing to diff against
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::ManifestNotFound { .. })
    }
}

/// Non-fatal problem after the live pointer has moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployWarning {
    /// Post-activation health check failed
    Health(String),
    /// Old-release deletion failed
    Cleanup(String),
    /// Remote manifest unreadable; deploy fell back to a full upload
    Manifest(String),
}

impl fmt::Display for DeployWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Health(msg) => write!(f, "health check: {}", msg),
            Self::Cleanup(msg) => write!(f, "cleanup failed: {}", msg),
            Self::Manifest(msg) => write!(f, "remote manifest ignored: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = DeployError::Validation {
            release: "20250101-120000".to_string(),
            missing: "sw.js".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation failed: sw.js missing from release 20250101-120000"
        );
    }

    #[test]
    fn test_stage_wrapper_names_step() {
        let err = DeployError::transport("upload", "broken pipe").at(DeployStage::Upload);
        assert_eq!(err.to_string(), "upload: upload failed on remote: broken pipe");
        assert_eq!(err.stage(), Some(DeployStage::Upload));
        assert!(matches!(err.root(), DeployError::Transport { .. }));
    }

    #[test]
    fn test_not_found_survives_wrapping() {
        let err = DeployError::ManifestNotFound {
            location: "current/build-manifest.json".to_string(),
        }
        .at(DeployStage::FetchManifest);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_warning_display() {
        let warning = DeployWarning::Cleanup("permission denied".to_string());
        assert_eq!(warning.to_string(), "cleanup failed: permission denied");
    }
}
