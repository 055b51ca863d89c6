//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables progress reporting, JSON event streams, and debugging.

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Deploy started
    Started {
        environment: String,
        target: String,
        release_id: String,
    },

    /// External site builder is running
    BuildStarted { command: String },

    /// Local manifest hashed and written
    ManifestBuilt { file_count: usize, total_bytes: u64 },

    /// Live manifest fetched; `previous` is `None` on first deploy
    RemoteManifest { previous: Option<String> },

    /// Delta computed
    DeltaComputed {
        changed: usize,
        unchanged: usize,
        deleted: usize,
        changed_bytes: u64,
        total_bytes: u64,
    },

    /// Dry run finished; nothing was touched
    DryRun { changed: Vec<String> },

    /// Release directory created
    ReleaseCreated { release_id: String },

    /// Files uploaded into the release
    Uploaded { file_count: usize, full: bool },

    /// No changed files, upload skipped
    UploadSkipped,

    /// `current` now points at the release
    Activated { release_id: String },

    /// Old releases removed
    CleanedUp { keep_n: usize, removed: Vec<String> },

    /// Health payload carries the release ID
    HealthOk { release_id: String },

    /// Non-fatal problem after activation
    Warning { message: String },

    /// Deploy completed
    Completed { release_id: String },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants detailed events (e.g., per-file lists)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test event sink that records all events
    struct RecordingEventSink {
        events: Arc<Mutex<Vec<DeployEvent>>>,
    }

    impl RecordingEventSink {
        fn new() -> (Self, Arc<Mutex<Vec<DeployEvent>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    events: events.clone(),
                },
                events,
            )
        }
    }

    impl DeployEventSink for RecordingEventSink {
        fn on_event(&self, event: DeployEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let (sink, events) = RecordingEventSink::new();

        sink.on_event(DeployEvent::Started {
            environment: "prod".to_string(),
            target: "deploy@example.org:/var/www/site".to_string(),
            release_id: "20250101-120000".to_string(),
        });

        sink.on_event(DeployEvent::Activated {
            release_id: "20250101-120000".to_string(),
        });

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
    }

    #[test]
    fn noop_sink_wants_no_details() {
        let sink = NoopEventSink;
        assert!(!sink.wants_detailed_events());
    }
}
