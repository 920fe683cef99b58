// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of observer events and snapshots for the terminal.

use clap::ValueEnum;
use dw_core::{Deployment, ObserverEvent, Snapshot, Status};

use crate::color;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// `… 1 line missing (8..=8) …`
pub fn gap_message(from: u64, to: u64) -> String {
    let count = to.saturating_sub(from).saturating_add(1);
    let noun = if count == 1 { "line" } else { "lines" };
    format!("… {count} {noun} missing ({from}..={to}) …")
}

/// Renders one session's events as output lines.
pub struct Renderer {
    format: OutputFormat,
    color: bool,
    job_id: String,
    deployment: Deployment,
}

impl Renderer {
    pub fn new(format: OutputFormat, color: bool, job_id: &str, deployment: Deployment) -> Self {
        Self { format, color, job_id: job_id.to_string(), deployment }
    }

    pub fn render(&self, event: &ObserverEvent) -> anyhow::Result<Vec<String>> {
        if self.format == OutputFormat::Json {
            return Ok(vec![serde_json::to_string(event)?]);
        }
        Ok(match event {
            ObserverEvent::Line(line) => vec![line.text.clone()],
            ObserverEvent::Gap { from, to } => vec![color::muted(self.color, &gap_message(*from, *to))],
            ObserverEvent::Status { previous: None, status } => self.header(*status),
            ObserverEvent::Status { previous: Some(previous), status } => {
                let mut out = vec![format!(
                    "{} {} → {}",
                    color::context(self.color, "status:"),
                    color::status(self.color, *previous),
                    color::status(self.color, *status)
                )];
                out.extend(self.url_line(*status));
                out
            }
        })
    }

    fn header(&self, status: Status) -> Vec<String> {
        let mut out = vec![format!(
            "{} {}  {}",
            color::header(self.color, "deployment"),
            self.job_id,
            color::status(self.color, status)
        )];
        if let Some(commit) = self.deployment.short_commit() {
            out.push(format!("{} {}", color::context(self.color, "commit:"), commit));
        }
        out.extend(self.url_line(status));
        out
    }

    fn url_line(&self, status: Status) -> Option<String> {
        if status != Status::Ready {
            return None;
        }
        let url = self.deployment.url()?;
        Some(format!("{} {}", color::context(self.color, "url:"), url))
    }
}

/// Render a snapshot for `dw status`.
pub fn format_snapshot(snapshot: &Snapshot, format: OutputFormat, color: bool) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(snapshot)?);
    }
    let renderer = Renderer::new(format, color, snapshot.job_id.as_str(), snapshot.deployment.clone());
    let mut out = renderer.header(snapshot.status);
    if let Some(project) = &snapshot.deployment.project_id {
        out.push(format!("{} {}", color::context(color, "project:"), project));
    }
    if let Some(created) = snapshot.deployment.created_at {
        out.push(format!("{} {}", color::context(color, "created:"), created.to_rfc3339()));
    }
    let count = snapshot.lines.len();
    out.push(format!(
        "{} {} line{}",
        color::context(color, "log:"),
        count,
        if count == 1 { "" } else { "s" }
    ));
    out.extend(snapshot.lines.iter().map(|l| l.text.clone()));
    Ok(out.join("\n"))
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
