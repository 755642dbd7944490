// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting and stopping the daemon from the CLI.

use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tokio::time::Instant;

use crate::client::{ClientError, DaemonClient};
use crate::config::Config;
use crate::env;

/// Interval between readiness checks on a starting or stopping daemon.
const POLL: Duration = Duration::from_millis(20);

/// Extra time a stopping daemon gets beyond its own drain window.
const STOP_GRACE: Duration = Duration::from_secs(12);

impl DaemonClient {
    /// Connect to the running daemon, spawning one if none answers.
    ///
    /// The transport settings in `config` only apply to a daemon started
    /// here; an already running daemon keeps the ones it started with.
    pub async fn connect_or_start(config: &Config) -> Result<Self, ClientError> {
        let client = Self::from_env()?;
        match client.ping().await {
            Ok(()) => return Ok(client),
            Err(e) if e.is_not_running() => {}
            Err(e) => return Err(e),
        }

        let state_dir = client.socket_path().parent().map(Path::to_path_buf).unwrap_or_default();
        spawn_daemon(config, &state_dir)?;

        let deadline = Instant::now() + env::daemon_start_timeout();
        while Instant::now() < deadline {
            tokio::time::sleep(POLL).await;
            if client.ping().await.is_ok() {
                tracing::debug!(socket = %client.socket_path().display(), "daemon started");
                return Ok(client);
            }
        }

        let log = std::fs::read_to_string(state_dir.join("daemon.log")).unwrap_or_default();
        Err(ClientError::StartFailed(
            parse_startup_error(&log)
                .unwrap_or_else(|| format!("no answer on {}", client.socket_path().display())),
        ))
    }
}

fn spawn_daemon(config: &Config, state_dir: &Path) -> Result<(), ClientError> {
    let binary = find_sshqd_binary();
    tracing::info!(binary = %binary.display(), "starting daemon");
    Command::new(&binary)
        .env("SSHQ_STATE_DIR", state_dir)
        .env("SSHQ_SSH_PROGRAM", &config.ssh_program)
        .env("SSHQ_CONNECT_TIMEOUT_MS", config.connect_timeout.as_millis().to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        // Own process group, so Ctrl-C at the terminal does not reach it.
        .process_group(0)
        .spawn()
        .map_err(|e| ClientError::StartFailed(format!("{}: {}", binary.display(), e)))?;
    Ok(())
}

/// Ask the daemon to stop and wait for its socket to go quiet.
///
/// Returns `false` when no daemon was running.
pub async fn daemon_stop() -> Result<bool, ClientError> {
    let client = DaemonClient::from_env()?;
    match client.shutdown().await {
        Ok(()) => {}
        Err(e) if e.is_not_running() => return Ok(false),
        Err(e) => return Err(e),
    }
    let deadline = Instant::now() + STOP_GRACE;
    while Instant::now() < deadline {
        if client.ping().await.is_err() {
            return Ok(true);
        }
        tokio::time::sleep(POLL).await;
    }
    Err(ClientError::Unexpected("daemon did not stop".to_string()))
}

/// `sshqd` next to the running executable, else from `PATH`.
fn find_sshqd_binary() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("sshqd")))
        .filter(|sibling| sibling.exists())
        .unwrap_or_else(|| PathBuf::from("sshqd"))
}

/// Error text the daemon logged during its most recent start, if any.
pub fn parse_startup_error(log: &str) -> Option<String> {
    const MARKER: &str = "--- sshqd: starting";
    const FAILED: &str = "Failed to start daemon: ";
    let last_start = log.rfind(MARKER)?;
    log[last_start..]
        .lines()
        .find_map(|line| line.split_once(FAILED).map(|(_, reason)| reason.trim().to_string()))
}

#[cfg(test)]
#[path = "client_lifecycle_tests.rs"]
mod tests;
