// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon log file setup.

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::env;
use crate::lifecycle::LifecycleError;

pub const DEFAULT_FILTER: &str = "sshq=info";

/// Line written before anything else on each start. The CLI scans for the
/// last one to find why a start failed.
pub fn startup_marker(pid: u32) -> String {
    format!("--- sshqd: starting (pid: {}) ---", pid)
}

/// Append the startup marker and route tracing to the log file.
pub fn init(log_path: &Path) -> Result<WorkerGuard, LifecycleError> {
    let dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(log_path)?;
    writeln!(file, "{}\n", startup_marker(std::process::id()))?;

    let file_name = log_path.file_name().unwrap_or_else(|| "daemon.log".as_ref());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter = env::log_filter()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .try_init();
    Ok(guard)
}
