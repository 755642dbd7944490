// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq status` - Show one command's current snapshot

use anyhow::Result;
use clap::Args;

use crate::client::{ClientError, DaemonClient};
use crate::color::Painter;
use crate::exit_error::ExitError;
use crate::output::{write_json, write_snapshot, OutputFormat};
use crate::session::status_exit_code;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Command id (default: the most recent command)
    pub id: Option<String>,
}

/// Exit code follows the command: 0 completed, 1 failed, 2 still running,
/// 4 cancelled.
pub async fn status(args: StatusArgs, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::from_env().map_err(|e| e.into_exit())?;
    let snapshot = match client.get(args.id.as_deref()).await {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_not_running() => return Err(not_found(args.id.as_deref()).into()),
        Err(e) => return Err(e.into_exit()),
    };

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => write_json(&mut out, &snapshot)?,
        OutputFormat::Text => write_snapshot(&mut out, &snapshot, Painter::detect())?,
    }
    match status_exit_code(snapshot.status) {
        0 => Ok(()),
        code => Err(ExitError::silent(code).into()),
    }
}

/// With no daemon there are no commands, so answer as an empty registry would.
pub(crate) fn not_found(id: Option<&str>) -> ExitError {
    match id {
        Some(id) => ExitError::usage(format!("command not found: {}", id)),
        None => ExitError::usage("no commands found"),
    }
}

/// Error for a daemon that is not running, or the original error.
pub(crate) fn absent_or(e: ClientError, id: &str) -> anyhow::Error {
    if e.is_not_running() {
        not_found(Some(id)).into()
    } else {
        e.into_exit()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
