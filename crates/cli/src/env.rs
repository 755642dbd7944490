// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Config file path: SSHQ_CONFIG > XDG_CONFIG_HOME/sshq/config.toml > ~/.config/sshq/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty("SSHQ_CONFIG") {
        return Some(PathBuf::from(path));
    }
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("sshq/config.toml"));
    }
    non_empty("HOME").map(|home| PathBuf::from(home).join(".config/sshq/config.toml"))
}

/// Daemon state directory: SSHQ_STATE_DIR > XDG_STATE_HOME/sshq > ~/.local/state/sshq
///
/// Must resolve the same way as the daemon's, since the socket lives here.
pub fn state_dir() -> Option<PathBuf> {
    if let Some(dir) = non_empty("SSHQ_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("sshq"));
    }
    non_empty("HOME").map(|home| PathBuf::from(home).join(".local/state/sshq"))
}

/// Request/response timeout for daemon IPC (default 5s, `SSHQ_IPC_TIMEOUT_MS`)
pub fn ipc_timeout() -> Duration {
    millis("SSHQ_IPC_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// How long to wait for a freshly spawned daemon (default 5s,
/// `SSHQ_DAEMON_START_TIMEOUT_MS`)
pub fn daemon_start_timeout() -> Duration {
    millis("SSHQ_DAEMON_START_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Wait deadline override (`SSHQ_WAIT_TIMEOUT_MS`)
pub fn wait_timeout() -> Option<Duration> {
    millis("SSHQ_WAIT_TIMEOUT_MS")
}

/// Status poll interval override (`SSHQ_POLL_INTERVAL_MS`)
pub fn poll_interval() -> Option<Duration> {
    millis("SSHQ_POLL_INTERVAL_MS")
}

/// SSH connect timeout override (`SSHQ_CONNECT_TIMEOUT_MS`)
pub fn connect_timeout() -> Option<Duration> {
    millis("SSHQ_CONNECT_TIMEOUT_MS")
}

/// Log filter directives: SSHQ_LOG > RUST_LOG
pub fn log_filter() -> Option<String> {
    non_empty("SSHQ_LOG").or_else(|| non_empty("RUST_LOG"))
}

fn millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
