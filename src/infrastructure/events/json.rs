//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON object for one event, `"event"` naming its kind
pub fn event_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            environment,
            target,
            release_id,
        } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "environment": environment,
            "target": target,
            "release_id": release_id,
        }),

        DeployEvent::BuildStarted { command } => serde_json::json!({
            "event": "build",
            "command": "deploy",
            "builder": command,
        }),

        DeployEvent::ManifestBuilt {
            file_count,
            total_bytes,
        } => serde_json::json!({
            "event": "manifest",
            "command": "deploy",
            "files": file_count,
            "bytes": total_bytes,
        }),

        DeployEvent::RemoteManifest { previous } => serde_json::json!({
            "event": "remote_manifest",
            "command": "deploy",
            "previous_release": previous,
            "first_deploy": previous.is_none(),
        }),

        DeployEvent::DeltaComputed {
            changed,
            unchanged,
            deleted,
            changed_bytes,
            total_bytes,
        } => serde_json::json!({
            "event": "delta",
            "command": "deploy",
            "changed": changed,
            "unchanged": unchanged,
            "deleted": deleted,
            "changed_bytes": changed_bytes,
            "total_bytes": total_bytes,
        }),

        DeployEvent::DryRun { changed } => serde_json::json!({
            "event": "dry_run",
            "command": "deploy",
            "changed_files": changed,
        }),

        DeployEvent::ReleaseCreated { release_id } => serde_json::json!({
            "event": "release_created",
            "command": "deploy",
            "release_id": release_id,
        }),

        DeployEvent::Uploaded { file_count, full } => serde_json::json!({
            "event": "uploaded",
            "command": "deploy",
            "files": file_count,
            "mode": if *full { "full" } else { "delta" },
        }),

        DeployEvent::UploadSkipped => serde_json::json!({
            "event": "upload_skipped",
            "command": "deploy",
        }),

        DeployEvent::Activated { release_id } => serde_json::json!({
            "event": "activated",
            "command": "deploy",
            "release_id": release_id,
        }),

        DeployEvent::CleanedUp { keep_n, removed } => serde_json::json!({
            "event": "cleanup",
            "command": "deploy",
            "keep": keep_n,
            "removed": removed,
        }),

        DeployEvent::HealthOk { release_id } => serde_json::json!({
            "event": "health",
            "command": "deploy",
            "status": "ok",
            "release_id": release_id,
        }),

        DeployEvent::Warning { message } => serde_json::json!({
            "event": "warning",
            "command": "deploy",
            "message": message,
        }),

        DeployEvent::Completed { release_id } => serde_json::json!({
            "event": "complete",
            "command": "deploy",
            "status": "success",
            "release_id": release_id,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_json(&event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
