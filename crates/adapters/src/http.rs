// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 client over TCP.
//!
//! Sends one request per connection (`Connection: close`). Responses are
//! framed by Content-Length, chunked transfer encoding, or connection close.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::endpoint::Endpoint;

/// Status code and body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP GET, optionally with a bearer token, bounded by `timeout` covering
/// connect + write + read.
pub async fn get(
    endpoint: &Endpoint,
    path: &str,
    token: Option<&str>,
    timeout: Duration,
) -> Result<HttpResponse, String> {
    let auth = token.map(|t| format!("Authorization: Bearer {t}\r\n")).unwrap_or_default();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\n{}Connection: close\r\n\r\n",
        endpoint.path(path),
        endpoint.host(),
        auth
    );
    tokio::time::timeout(timeout, send_request(&endpoint.addr(), &request))
        .await
        .map_err(|_| "HTTP request timed out".to_string())?
}

async fn send_request(addr: &str, request: &str) -> Result<HttpResponse, String> {
    let mut stream =
        TcpStream::connect(addr).await.map_err(|e| format!("TCP connect failed: {}", e))?;
    stream.write_all(request.as_bytes()).await.map_err(|e| format!("write failed: {}", e))?;

    let mut reader = BufReader::new(&mut stream);
    read_http_response(&mut reader).await
}

/// Read and parse an HTTP/1.1 response from a buffered stream.
pub(crate) async fn read_http_response<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<HttpResponse, String> {
    let mut status_line = String::new();
    reader.read_line(&mut status_line).await.map_err(|e| format!("read status failed: {}", e))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| format!("malformed status line: {:?}", status_line.trim_end()))?;

    // Headers (case-insensitive)
    let mut content_length: Option<usize> = None;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.map_err(|e| format!("read header failed: {}", e))?;
        if line == "\r\n" || line == "\n" || line.is_empty() {
            break;
        }
        let line_lower = line.to_ascii_lowercase();
        if let Some(val) = line_lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().ok();
        } else if let Some(val) = line_lower.strip_prefix("transfer-encoding:") {
            chunked = val.contains("chunked");
        }
    }

    let bytes = if chunked {
        read_chunked(reader).await?
    } else if let Some(len) = content_length {
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).await.map_err(|e| format!("read body failed: {}", e))?;
        buf
    } else {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.map_err(|e| format!("read body failed: {}", e))?;
        buf
    };

    Ok(HttpResponse { status, body: String::from_utf8_lossy(&bytes).into_owned() })
}

async fn read_chunked<R: AsyncRead + Unpin>(reader: &mut BufReader<R>) -> Result<Vec<u8>, String> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).await.map_err(|e| format!("read chunk failed: {}", e))?;
        let size_hex = size_line.trim().split(';').next().unwrap_or("");
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| format!("malformed chunk size: {:?}", size_line.trim()))?;
        if size == 0 {
            // Trailers end with an empty line
            loop {
                let mut trailer = String::new();
                let n = reader
                    .read_line(&mut trailer)
                    .await
                    .map_err(|e| format!("read trailer failed: {}", e))?;
                if n == 0 || trailer.trim().is_empty() {
                    return Ok(body);
                }
            }
        }
        let start = body.len();
        body.resize(start + size, 0);
        reader
            .read_exact(&mut body[start..])
            .await
            .map_err(|e| format!("read chunk failed: {}", e))?;
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).await.map_err(|e| format!("read chunk failed: {}", e))?;
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
