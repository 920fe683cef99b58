// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod status;
pub mod watch;

use clap::Args;
use dw_adapters::{HttpSnapshotSource, WsLiveChannel};
use dw_observer::Observer;

use crate::config::{Layer, Settings};
use crate::exit_error::{codes, ExitError};

/// Connection flags shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Base URL of the deployment API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
    /// Base URL of the live log channel (default: API URL with ws://)
    #[arg(long, value_name = "URL")]
    pub ws_url: Option<String>,
    /// Bearer token
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,
}

impl ApiArgs {
    pub fn layer(&self) -> Layer {
        Layer {
            api_url: self.api_url.clone(),
            ws_url: self.ws_url.clone(),
            token: self.token.clone(),
            ..Layer::default()
        }
    }
}

pub(crate) fn settings(flags: Layer) -> Result<Settings, ExitError> {
    Settings::load(flags).map_err(|e| ExitError::new(codes::USAGE, e.to_string()))
}

pub(crate) fn snapshot_source(settings: &Settings) -> HttpSnapshotSource {
    let source = HttpSnapshotSource::new(settings.api.clone());
    match &settings.token {
        Some(token) => source.token(token.clone()),
        None => source,
    }
}

pub(crate) fn observer(settings: &Settings) -> Observer<HttpSnapshotSource, WsLiveChannel> {
    let mut channel = WsLiveChannel::new(settings.ws.clone()).mode(settings.observer.channel_mode);
    if let Some(token) = &settings.token {
        channel = channel.token(token.clone());
    }
    Observer::new(snapshot_source(settings), channel, settings.observer.clone())
}
