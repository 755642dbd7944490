// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::env::state_dir;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/sshq)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Fixed paths under the state directory. One daemon serves one user.
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::under(state_dir()?))
    }

    pub fn under(state_dir: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory (set SSHQ_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("daemon already running (lock held): {0}")]
    LockFailed(std::io::Error),

    #[error("failed to bind {}: {}", .0.display(), .1)]
    BindFailed(PathBuf, std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // Held to keep the exclusive lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub start_time: Instant,
}

/// Result of daemon startup: the held lock plus the bound socket.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
}

impl DaemonState {
    /// Remove the socket and PID files. Commands must already be drained.
    pub fn shutdown(self) {
        info!("shutting down daemon");
        for path in [&self.config.socket_path, &self.config.lock_path] {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to remove file");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
