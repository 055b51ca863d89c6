//! Deploy Use Case
//!
//! Orchestrates one deploy against a single environment:
//! 1. Build the site (unless `no_build`)
//! 2. Hash the build output into a manifest
//! 3. Fetch the live manifest and compute the delta
//! 4. Stop here on a dry run
//! 5. Create the release, upload, activate
//! 6. Prune old releases and run the health check
//!
//! Failures before activation abort the deploy and are returned wrapped in
//! the stage they happened in. After activation the release is live, so
//! cleanup and health check failures only produce warnings.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::Manifest;
use crate::domain::ports::{
    DeployEvent, DeployEventSink, Deployer, NoopEventSink, RevisionSource, SiteBuilder,
};
use crate::domain::services::{compute_delta, delta_size};
use crate::domain::value_objects::{Environment, ReleaseId, MANIFEST_FILE};
use crate::error::{DeployError, DeployResult, DeployStage, DeployWarning};
use crate::infrastructure::manifest::{write_manifest, ManifestBuilder};

use super::options::DeployOptions;
use super::result::{DeployReport, UploadKind};

/// Deploy use case - orchestrates the release lifecycle
///
/// Parameterized by its ports so tests can drive it with in-memory mocks.
pub struct DeployUseCase<D, B, R>
where
    D: Deployer,
    B: SiteBuilder,
    R: RevisionSource,
{
    deployer: D,
    builder: B,
    revision: R,
}

impl<D, B, R> DeployUseCase<D, B, R>
where
    D: Deployer,
    B: SiteBuilder,
    R: RevisionSource,
{
    pub fn new(deployer: D, builder: B, revision: R) -> Self {
        Self {
            deployer,
            builder,
            revision,
        }
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    /// Execute the deploy use case
    pub fn execute(&self, env: &Environment, options: &DeployOptions) -> DeployResult<DeployReport> {
        self.execute_with_events(env, options, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    pub fn execute_with_events(
        &self,
        env: &Environment,
        options: &DeployOptions,
        events: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DeployReport> {
        let release_id = self.release_id(options);
        let mut report = DeployReport::new(release_id.clone());
        report.dry_run = options.dry_run;

        events.on_event(DeployEvent::Started {
            environment: env.name.clone(),
            target: self.deployer.describe(),
            release_id: release_id.to_string(),
        });

        if !options.no_build {
            events.on_event(DeployEvent::BuildStarted {
                command: self.builder.describe(),
            });
            let base_url = Some(env.base_url.as_str()).filter(|url| !url.is_empty());
            self.builder
                .build(&release_id, base_url)
                .map_err(|e| e.at(DeployStage::Build))?;
        }

        let local = ManifestBuilder::new()
            .with_workers(options.workers)
            .build(&options.build_dir, release_id.as_str())
            .map_err(|e| e.at(DeployStage::BuildManifest))?;
        report.total_bytes = local.total_size();
        events.on_event(DeployEvent::ManifestBuilt {
            file_count: local.len(),
            total_bytes: report.total_bytes,
        });

        // Held until the report is returned.
        let _lock = if options.dry_run {
            None
        } else {
            self.deployer
                .lock()
                .map_err(|e| e.at(DeployStage::Lock))?
        };

        let remote = self.fetch_remote(&mut report, events.as_ref())?;
        report.previous = remote.as_ref().map(|m| m.release_id().to_string());
        events.on_event(DeployEvent::RemoteManifest {
            previous: report.previous.clone(),
        });

        let empty = Manifest::empty();
        let delta = compute_delta(&local, remote.as_ref().unwrap_or(&empty));
        report.changed_bytes = delta_size(&local, &delta.changed);
        events.on_event(DeployEvent::DeltaComputed {
            changed: delta.changed.len(),
            unchanged: delta.unchanged.len(),
            deleted: delta.deleted.len(),
            changed_bytes: report.changed_bytes,
            total_bytes: report.total_bytes,
        });
        report.delta = delta;

        if options.dry_run {
            events.on_event(DeployEvent::DryRun {
                changed: report.delta.changed.clone(),
            });
            return Ok(report);
        }

        write_manifest(&local, &options.build_dir.join(MANIFEST_FILE))
            .map_err(|e| e.at(DeployStage::WriteManifest))?;

        self.deployer
            .create_release(&release_id)
            .map_err(|e| e.at(DeployStage::CreateRelease))?;
        events.on_event(DeployEvent::ReleaseCreated {
            release_id: release_id.to_string(),
        });

        let full = options.full || remote.as_ref().map_or(true, Manifest::is_empty);
        self.upload(&release_id, options, full, &mut report)
            .map_err(|e| e.at(DeployStage::Upload))?;
        match report.upload {
            UploadKind::Skipped => events.on_event(DeployEvent::UploadSkipped),
            _ => events.on_event(DeployEvent::Uploaded {
                file_count: report.uploaded,
                full,
            }),
        }

        self.deployer
            .activate(&release_id)
            .map_err(|e| e.at(DeployStage::Activate))?;
        info!(release = %release_id, "release activated");
        events.on_event(DeployEvent::Activated {
            release_id: release_id.to_string(),
        });

        match self.deployer.cleanup(env.keep_n) {
            Ok(removed) => {
                events.on_event(DeployEvent::CleanedUp {
                    keep_n: env.keep_n,
                    removed: removed.clone(),
                });
                report.removed = removed;
            }
            Err(e) => {
                Self::warn(&mut report, events.as_ref(), DeployWarning::Cleanup(e.to_string()))
            }
        }

        match self.deployer.health_check(&release_id) {
            Ok(()) => events.on_event(DeployEvent::HealthOk {
                release_id: release_id.to_string(),
            }),
            Err(e) => {
                let message = match e {
                    DeployError::Health { message } => message,
                    other => other.to_string(),
                };
                Self::warn(&mut report, events.as_ref(), DeployWarning::Health(message))
            }
        }

        events.on_event(DeployEvent::Completed {
            release_id: release_id.to_string(),
        });
        Ok(report)
    }

    fn release_id(&self, options: &DeployOptions) -> ReleaseId {
        match &options.release_id {
            Some(id) => id.clone(),
            None => {
                let revision = self.revision.short_revision();
                ReleaseId::generate(Utc::now(), revision.as_deref())
            }
        }
    }

    /// Live manifest, or `None` when there is nothing usable to diff against
    fn fetch_remote(
        &self,
        report: &mut DeployReport,
        events: &dyn DeployEventSink,
    ) -> DeployResult<Option<Manifest>> {
        match self.deployer.fetch_manifest() {
            Ok(manifest) => Ok(Some(manifest)),
            Err(e) if e.is_not_found() => {
                debug!("no live manifest, first deploy");
                Ok(None)
            }
            Err(e) if matches!(e.root(), DeployError::ManifestParse { .. }) => {
                Self::warn(report, events, DeployWarning::Manifest(e.to_string()));
                Ok(None)
            }
            Err(e) => Err(e.at(DeployStage::FetchManifest)),
        }
    }

    fn upload(
        &self,
        release_id: &ReleaseId,
        options: &DeployOptions,
        full: bool,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        if full {
            report.uploaded = self.deployer.upload_full(&options.build_dir, release_id)?;
            report.upload = UploadKind::Full;
        } else if report.delta.changed.is_empty() {
            report.upload = UploadKind::Skipped;
        } else {
            let mut files = report.delta.changed.clone();
            if !files.iter().any(|f| f == MANIFEST_FILE) {
                files.push(MANIFEST_FILE.to_string());
            }
            self.deployer
                .upload_delta(&options.build_dir, release_id, &files)?;
            report.uploaded = files.len();
            report.upload = UploadKind::Delta;
        }
        Ok(())
    }

    fn warn(report: &mut DeployReport, events: &dyn DeployEventSink, warning: DeployWarning) {
        warn!("{}", warning);
        events.on_event(DeployEvent::Warning {
            message: warning.to_string(),
        });
        report.warnings.push(warning);
    }
}
