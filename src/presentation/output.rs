//! Output Rendering
//!
//! Text and JSON renderings of the non-deploy commands. Deploy progress is
//! rendered by the event sinks in `infrastructure::events`.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::application::{GeneratedManifest, StatusReport};
use crate::domain::entities::Release;
use crate::domain::value_objects::{Environment, ReleaseId};
use crate::infrastructure::events::megabytes;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_json(out: &mut dyn Write, value: serde_json::Value) -> io::Result<()> {
    writeln!(out, "{}", value)
}

pub fn render_releases(
    out: &mut dyn Write,
    format: OutputFormat,
    target: &str,
    releases: &[Release],
) -> io::Result<()> {
    if format == OutputFormat::Json {
        let items: Vec<_> = releases
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "created_at": r.created_at.to_rfc3339(),
                    "current": r.current,
                })
            })
            .collect();
        return write_json(
            out,
            json!({ "command": "list", "target": target, "releases": items }),
        );
    }

    if releases.is_empty() {
        return writeln!(out, "No releases found");
    }

    writeln!(out, "Releases on {}:", target)?;
    writeln!(out)?;
    for release in releases {
        let marker = if release.current { " (current)" } else { "" };
        writeln!(
            out,
            "  {}  {}{}",
            timestamp(release.created_at),
            release.id,
            marker
        )?;
    }
    Ok(())
}

pub fn render_rollback(
    out: &mut dyn Write,
    format: OutputFormat,
    env: &Environment,
    release_id: &ReleaseId,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            json!({
                "command": "rollback",
                "environment": env.name,
                "release_id": release_id.as_str(),
            }),
        ),
        OutputFormat::Text => writeln!(out, "Done! Rolled back {} to {}", env.name, release_id),
    }
}

pub fn render_status(
    out: &mut dyn Write,
    format: OutputFormat,
    env: &Environment,
    target: &str,
    status: &StatusReport,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(
            out,
            json!({
                "command": "status",
                "environment": env.name,
                "target": target,
                "current": status.current,
                "deployed_at": status.deployed_at.map(|at| at.to_rfc3339()),
                "health": status.health,
            }),
        );
    }

    writeln!(out, "Environment: {}", env.name)?;
    writeln!(out, "Target:      {}", target)?;
    writeln!(out)?;

    let Some(current) = &status.current else {
        return writeln!(out, "No current release");
    };
    writeln!(out, "Current release: {}", current)?;
    if let Some(at) = status.deployed_at {
        writeln!(out, "Deployed at:     {}", timestamp(at))?;
    }
    if let Some(health) = &status.health {
        writeln!(out)?;
        writeln!(out, "healthz.json:")?;
        writeln!(out, "{}", health)?;
    }
    Ok(())
}

pub fn render_manifest(
    out: &mut dyn Write,
    format: OutputFormat,
    generated: &GeneratedManifest,
) -> io::Result<()> {
    let manifest = &generated.manifest;
    match format {
        OutputFormat::Json => write_json(
            out,
            json!({
                "command": "manifest",
                "path": generated.path.display().to_string(),
                "release_id": manifest.release_id(),
                "files": manifest.len(),
                "total_bytes": manifest.total_size(),
            }),
        ),
        OutputFormat::Text => {
            writeln!(out, "Manifest written to {}", generated.path.display())?;
            writeln!(out, "  Files: {}", manifest.len())?;
            writeln!(out, "  Size:  {:.2} MB", megabytes(manifest.total_size()))
        }
    }
}
