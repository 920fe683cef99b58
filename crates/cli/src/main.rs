// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dw: follow deployments from the terminal

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;
mod sink;

use clap::{Parser, Subcommand};

use commands::{status, watch};
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "dw", version = env::VERSION, styles = color::styles())]
#[command(about = "Follow deployment logs and status")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream a deployment's log until it finishes
    Watch(watch::WatchArgs),
    /// Print a deployment's current status and captured log
    Status(status::StatusArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Watch(args) => watch::handle(args).await,
        Command::Status(args) => status::handle(args).await,
    }
}

fn main() {
    let cli = Cli::parse();
    let guard = logging::init();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(run(cli)));

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => exit.code,
            None => 1,
        };
        eprintln!("error: {err:#}");
        drop(guard);
        std::process::exit(code);
    }
}
