// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Base URLs of the deployment API.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("invalid url {0:?}: expected scheme://host[:port][/path]")]
    Invalid(String),
    #[error("unsupported scheme {0:?} (plain http:// and ws:// only)")]
    UnsupportedScheme(String),
    #[error("invalid port in {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Ws,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Ws => "ws",
        }
    }
}

/// A parsed base URL such as `http://localhost:8080/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
    /// Path prefix without trailing slash (`""` or `/api`)
    base_path: String,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, EndpointError> {
        let (scheme, rest) = url.split_once("://").ok_or_else(|| EndpointError::Invalid(url.into()))?;
        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" => Scheme::Http,
            "ws" => Scheme::Ws,
            _ => return Err(EndpointError::UnsupportedScheme(scheme.to_string())),
        };
        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        if authority.is_empty() {
            return Err(EndpointError::Invalid(url.into()));
        }
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| EndpointError::InvalidPort(url.into()))?;
                (host, port)
            }
            None => (authority, 80),
        };
        if host.is_empty() {
            return Err(EndpointError::Invalid(url.into()));
        }
        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            base_path: path.trim_end_matches('/').to_string(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request target for `path` (which must start with `/`).
    pub fn path(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme.as_str(), self.addr(), self.path(path))
    }

    /// The same location over the WebSocket scheme.
    pub fn to_ws(&self) -> Endpoint {
        Endpoint { scheme: Scheme::Ws, ..self.clone() }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url(""))
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
