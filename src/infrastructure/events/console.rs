//! Console Event Sink
//!
//! Human-readable `==> Step` progress on stdout.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

const MB: f64 = 1024.0 * 1024.0;

/// Bytes as fractional mebibytes
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / MB
}

/// `part` as a percentage of `whole`; zero when `whole` is zero
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Event sink printing deploy progress for humans
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    detailed: bool,
}

impl ConsoleEventSink {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            detailed: true,
        }
    }

    /// Suppress per-file listings
    pub fn summary_only(mut self) -> Self {
        self.detailed = false;
        self
    }

    fn render(&self, event: &DeployEvent) -> String {
        match event {
            DeployEvent::Started {
                environment,
                target,
                release_id,
            } => format!(
                "==> Deploying to {}\n    Release: {}\n    Target:  {}\n\n",
                environment, release_id, target
            ),
            DeployEvent::BuildStarted { command } => {
                format!("==> Building site ({})...\n", command)
            }
            DeployEvent::ManifestBuilt {
                file_count,
                total_bytes,
            } => format!(
                "==> Generated build manifest\n    {} files hashed ({:.2} MB)\n\n",
                file_count,
                megabytes(*total_bytes)
            ),
            DeployEvent::RemoteManifest { previous } => match previous {
                Some(id) if !id.is_empty() => format!(
                    "==> Fetched remote manifest\n    Previous release: {}\n\n",
                    id
                ),
                Some(_) => "==> Fetched remote manifest\n    Previous release: unknown\n\n"
                    .to_string(),
                None => "==> Fetched remote manifest\n    No previous manifest (first deploy)\n\n"
                    .to_string(),
            },
            DeployEvent::DeltaComputed {
                changed,
                unchanged,
                deleted,
                changed_bytes,
                total_bytes,
            } => {
                let mut out = format!(
                    "==> Calculated delta\n    Changed:   {} files\n    Unchanged: {} files\n",
                    changed, unchanged
                );
                if *deleted > 0 {
                    out.push_str(&format!(
                        "    Deleted:   {} files (will remain in hardlinked release)\n",
                        deleted
                    ));
                }
                out.push_str(&format!(
                    "    Delta:     {:.2} MB ({:.1}% of {:.2} MB total)\n\n",
                    megabytes(*changed_bytes),
                    percent(*changed_bytes, *total_bytes),
                    megabytes(*total_bytes)
                ));
                out
            }
            DeployEvent::DryRun { changed } => {
                let mut out = "==> Dry run - no changes made\n".to_string();
                if self.detailed && !changed.is_empty() {
                    out.push_str("\nChanged files:\n");
                    for file in changed {
                        out.push_str(&format!("  + {}\n", file));
                    }
                }
                out
            }
            DeployEvent::ReleaseCreated { release_id } => {
                format!("==> Created release directory {}\n", release_id)
            }
            DeployEvent::Uploaded { file_count, full } => format!(
                "==> Uploaded {} ({} files)\n\n",
                if *full { "all files" } else { "changed files" },
                file_count
            ),
            DeployEvent::UploadSkipped => "==> No files changed, skipping upload\n\n".to_string(),
            DeployEvent::Activated { release_id } => {
                format!("==> Activated release {}\n\n", release_id)
            }
            DeployEvent::CleanedUp { keep_n, removed } => {
                let mut out = format!("==> Cleaned old releases (keeping {})\n", keep_n);
                for id in removed {
                    out.push_str(&format!("    Removed {}\n", id));
                }
                out.push('\n');
                out
            }
            DeployEvent::HealthOk { .. } => "==> Health check\n    OK\n\n".to_string(),
            DeployEvent::Warning { message } => format!("    Warning: {}\n\n", message),
            DeployEvent::Completed { release_id } => {
                format!("Done! Release {} is now live.\n", release_id)
            }
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let text = self.render(&event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(text.as_bytes());
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
