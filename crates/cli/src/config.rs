// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings resolution: defaults < config file < environment < flags.

use dw_adapters::{Endpoint, EndpointError};
use dw_observer::{Backoff, ObserverConfig};
use dw_wire::{ChannelMode, WireError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{key}: {source}")]
    Endpoint {
        key: &'static str,
        #[source]
        source: EndpointError,
    },
    #[error(transparent)]
    ChannelMode(#[from] WireError),
}

/// One source of settings. Every field is optional so sources can be
/// stacked with [`Layer::over`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
    pub token: Option<String>,
    pub gap_timeout_ms: Option<u64>,
    pub backoff_base_ms: Option<u64>,
    pub backoff_cap_ms: Option<u64>,
    pub max_pending: Option<u64>,
    pub snapshot_attempts: Option<u64>,
    pub channel_mode: Option<String>,
}

impl Layer {
    /// `self` with every field that `higher` sets replaced.
    pub fn over(self, higher: Layer) -> Layer {
        Layer {
            api_url: higher.api_url.or(self.api_url),
            ws_url: higher.ws_url.or(self.ws_url),
            token: higher.token.or(self.token),
            gap_timeout_ms: higher.gap_timeout_ms.or(self.gap_timeout_ms),
            backoff_base_ms: higher.backoff_base_ms.or(self.backoff_base_ms),
            backoff_cap_ms: higher.backoff_cap_ms.or(self.backoff_cap_ms),
            max_pending: higher.max_pending.or(self.max_pending),
            snapshot_attempts: higher.snapshot_attempts.or(self.snapshot_attempts),
            channel_mode: higher.channel_mode.or(self.channel_mode),
        }
    }

    pub fn from_env() -> Layer {
        Layer {
            api_url: env::api_url(),
            ws_url: env::ws_url(),
            token: env::token(),
            gap_timeout_ms: env::gap_timeout_ms(),
            backoff_base_ms: env::backoff_base_ms(),
            backoff_cap_ms: env::backoff_cap_ms(),
            max_pending: env::max_pending(),
            snapshot_attempts: env::snapshot_attempts(),
            channel_mode: env::channel_mode(),
        }
    }

    /// Parse a TOML config file. A missing file is an empty layer unless
    /// `required` is set.
    pub fn from_file(path: &Path, required: bool) -> Result<Layer, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Layer::default());
            }
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: Endpoint,
    pub ws: Endpoint,
    pub token: Option<String>,
    pub observer: ObserverConfig,
}

impl Settings {
    /// Stack the config file, the environment and `flags` over the defaults.
    pub fn load(flags: Layer) -> Result<Settings, ConfigError> {
        let file = match env::config_path() {
            Some(path) => Layer::from_file(&path, env::config_path_explicit())?,
            None => Layer::default(),
        };
        Settings::resolve(file.over(Layer::from_env()).over(flags))
    }

    pub fn resolve(layer: Layer) -> Result<Settings, ConfigError> {
        let api_url = layer.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let api = Endpoint::parse(api_url)
            .map_err(|source| ConfigError::Endpoint { key: "api_url", source })?;
        let ws = match layer.ws_url.as_deref() {
            Some(url) => Endpoint::parse(url)
                .map_err(|source| ConfigError::Endpoint { key: "ws_url", source })?,
            None => api.to_ws(),
        };

        let defaults = ObserverConfig::default();
        let millis = |v: Option<u64>, default: Duration| v.map(Duration::from_millis).unwrap_or(default);
        let backoff = Backoff::new(
            millis(layer.backoff_base_ms, defaults.backoff.base),
            millis(layer.backoff_cap_ms, defaults.backoff.cap),
        );
        let channel_mode = match layer.channel_mode.as_deref() {
            Some(mode) => mode.parse::<ChannelMode>()?,
            None => defaults.channel_mode,
        };
        let observer = defaults
            .clone()
            .gap_timeout(millis(layer.gap_timeout_ms, defaults.gap_timeout))
            .backoff(backoff)
            .max_pending(layer.max_pending.map_or(defaults.max_pending, |n| {
                usize::try_from(n).unwrap_or(usize::MAX)
            }))
            .snapshot_attempts(layer.snapshot_attempts.map_or(defaults.snapshot_attempts, |n| {
                u32::try_from(n).unwrap_or(u32::MAX)
            }))
            .channel_mode(channel_mode);

        Ok(Settings { api, ws, token: layer.token, observer })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
