// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dw status`: one-shot snapshot print

use anyhow::Result;
use clap::Args;
use dw_core::JobId;
use dw_observer::loader;

use super::ApiArgs;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_snapshot, OutputFormat};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Deployment id
    pub id: String,
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn handle(args: StatusArgs) -> Result<()> {
    let settings = super::settings(args.api.layer())?;
    let source = super::snapshot_source(&settings);
    let job_id = JobId::new(args.id);

    let snapshot = loader::load(&source, &job_id, &settings.observer).await.map_err(ExitError::from)?;
    println!("{}", format_snapshot(&snapshot, args.output, color::should_colorize())?);
    Ok(())
}
