// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging for the `dw` binary.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

use crate::env;

/// Install the global subscriber.
///
/// Logs go to stderr unless `DW_LOG_FILE` is set. The returned guard must
/// stay alive until exit so buffered file output is flushed.
pub fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = match env::log_file().map(|path| file_appender(&path)) {
        Some(Ok(appender)) => appender,
        Some(Err(e)) => {
            eprintln!("dw: cannot open DW_LOG_FILE ({e}), logging to stderr");
            return stderr(filter);
        }
        None => return stderr(filter),
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).try_init().ok()?;
    Some(guard)
}

fn stderr(filter: EnvFilter) -> Option<WorkerGuard> {
    // A subscriber may already be installed; keep it
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
    None
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("dw.log");
    RollingFileAppender::builder().rotation(Rotation::NEVER).filename_prefix(name).build(dir)
}
