// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dw watch`: follow a deployment until it finishes

use anyhow::Result;
use clap::Args;
use dw_core::{JobId, ObserverEvent, Status};
use std::path::PathBuf;

use super::ApiArgs;
use crate::color;
use crate::config::Layer;
use crate::exit_error::{codes, ExitError};
use crate::output::{OutputFormat, Renderer};
use crate::sink::LogFile;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Deployment id
    pub id: String,
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
    /// Also append merged lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Milliseconds to wait for a missing line before skipping it
    #[arg(long, value_name = "MS")]
    pub gap_timeout_ms: Option<u64>,
    /// The live channel sends raw text and replays history on every connect
    #[arg(long)]
    pub replay_all: bool,
    #[command(flatten)]
    pub api: ApiArgs,
}

impl WatchArgs {
    fn layer(&self) -> Layer {
        Layer {
            gap_timeout_ms: self.gap_timeout_ms,
            channel_mode: self.replay_all.then(|| "replay-all".to_string()),
            ..self.api.layer()
        }
    }
}

pub async fn handle(args: WatchArgs) -> Result<()> {
    if args.id.trim().is_empty() {
        return Err(ExitError::new(codes::USAGE, "deployment id must not be empty").into());
    }
    let settings = super::settings(args.layer())?;
    let observer = super::observer(&settings);
    let job_id = JobId::new(args.id.as_str());

    let mut session = observer.start(job_id.clone()).await.map_err(ExitError::from)?;
    let renderer =
        Renderer::new(args.output, color::should_colorize(), job_id.as_str(), session.deployment().clone());
    let sink = args.log_file.map(LogFile::new);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_status: Option<Status> = None;
    loop {
        let item = tokio::select! {
            item = session.next_event() => item,
            _ = &mut ctrl_c => {
                tracing::info!(%job_id, "watch: interrupted");
                session.cancel().await;
                return Err(ExitError::new(codes::INTERRUPTED, "interrupted").into());
            }
        };
        let Some(item) = item else { break };
        let event = item.map_err(ExitError::from)?;

        if let ObserverEvent::Status { status, .. } = &event {
            last_status = Some(*status);
        }
        if let Some(sink) = &sink {
            sink.append(&event);
        }
        for line in renderer.render(&event)? {
            println!("{line}");
        }
    }

    match last_status.and_then(|status| ExitError::for_final_status(job_id.as_str(), status)) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
