//! Releases Use Case
//!
//! Read-mostly operations on an environment's releases: listing, rollback
//! and status.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::Release;
use crate::domain::ports::Deployer;
use crate::domain::value_objects::ReleaseId;
use crate::error::DeployResult;

/// What is live on an environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// ID of the live release; `None` before the first deploy
    pub current: Option<String>,
    /// Creation time of the live release, when the target reports it
    pub deployed_at: Option<DateTime<Utc>>,
    /// Health payload of the live release, pretty-printed if it is JSON
    pub health: Option<String>,
}

impl StatusReport {
    pub fn is_deployed(&self) -> bool {
        self.current.is_some()
    }
}

pub struct ReleasesUseCase<D: Deployer> {
    deployer: D,
}

impl<D: Deployer> ReleasesUseCase<D> {
    pub fn new(deployer: D) -> Self {
        Self { deployer }
    }

    pub fn describe(&self) -> String {
        self.deployer.describe()
    }

    /// Releases, newest first
    pub fn list(&self) -> DeployResult<Vec<Release>> {
        self.deployer.list_releases()
    }

    /// Switch `current` to `target`, or to the newest non-current release
    pub fn rollback(&self, target: Option<&ReleaseId>) -> DeployResult<ReleaseId> {
        let id = self.deployer.rollback(target)?;
        info!(release = %id, "rolled back");
        Ok(id)
    }

    pub fn status(&self) -> DeployResult<StatusReport> {
        let Some(current) = self.deployer.current_release()? else {
            return Ok(StatusReport {
                current: None,
                deployed_at: None,
                health: None,
            });
        };

        let deployed_at = self
            .deployer
            .list_releases()?
            .into_iter()
            .find(|release| release.id == current)
            .map(|release| release.created_at);

        // A live release without a readable health payload is still live.
        let health = match self.deployer.health_payload() {
            Ok(payload) => Some(pretty_payload(&payload)),
            Err(e) => {
                debug!("health payload unavailable: {}", e);
                None
            }
        };

        Ok(StatusReport {
            current: Some(current),
            deployed_at,
            health,
        })
    }
}

/// Pretty-print JSON payloads; anything else is returned trimmed
pub fn pretty_payload(payload: &str) -> String {
    serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| payload.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::LocalDeployer;
    use std::fs;
    use tempfile::tempdir;

    fn publish(deployer: &LocalDeployer, id: &str) -> ReleaseId {
        let id = ReleaseId::parse(id).unwrap();
        deployer.create_release(&id).unwrap();
        let dir = deployer.layout().release_dir(&id);
        // Files may be hardlinked into the previous release.
        for (name, content) in [
            ("index.html", "<h1>hi</h1>".to_string()),
            ("sw.js", String::new()),
            ("healthz.json", format!("{{\"release\":\"{}\"}}", id)),
        ] {
            let path = dir.join(name);
            let _ = fs::remove_file(&path);
            fs::write(path, content).unwrap();
        }
        deployer.activate(&id).unwrap();
        id
    }

    #[test]
    fn status_before_first_deploy() {
        let dir = tempdir().unwrap();
        let use_case = ReleasesUseCase::new(LocalDeployer::new(dir.path()));

        let status = use_case.status().unwrap();

        assert!(!status.is_deployed());
        assert_eq!(status.health, None);
    }

    #[test]
    fn status_reports_live_release_and_health() {
        let dir = tempdir().unwrap();
        let deployer = LocalDeployer::new(dir.path());
        publish(&deployer, "20250101-120000");
        let use_case = ReleasesUseCase::new(deployer);

        let status = use_case.status().unwrap();

        assert_eq!(status.current.as_deref(), Some("20250101-120000"));
        assert!(status.deployed_at.is_some());
        assert_eq!(
            status.health.as_deref(),
            Some("{\n  \"release\": \"20250101-120000\"\n}")
        );
    }

    #[test]
    fn rollback_returns_previous_release() {
        let dir = tempdir().unwrap();
        let deployer = LocalDeployer::new(dir.path());
        let first = publish(&deployer, "20250101-120000");
        publish(&deployer, "20250102-120000");
        let use_case = ReleasesUseCase::new(deployer);

        assert_eq!(use_case.rollback(None).unwrap(), first);
        assert_eq!(
            use_case.status().unwrap().current.as_deref(),
            Some("20250101-120000")
        );
    }

    #[test]
    fn pretty_payload_leaves_plain_text_alone() {
        assert_eq!(pretty_payload("ok\n"), "ok");
        assert_eq!(pretty_payload("{\"a\":1}"), "{\n  \"a\": 1\n}");
    }
}
