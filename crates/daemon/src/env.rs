// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: SSHQ_STATE_DIR > XDG_STATE_HOME/sshq > ~/.local/state/sshq
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = non_empty("SSHQ_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("sshq"));
    }
    let home = non_empty("HOME").ok_or(LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/sshq"))
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    millis("SSHQ_IPC_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// OpenSSH client used for `ssh` targets (`SSHQ_SSH_PROGRAM`, default `ssh`).
pub fn ssh_program() -> String {
    non_empty("SSHQ_SSH_PROGRAM").unwrap_or_else(|| "ssh".to_string())
}

/// SSH connect timeout (`SSHQ_CONNECT_TIMEOUT_MS`).
pub fn connect_timeout() -> Duration {
    millis("SSHQ_CONNECT_TIMEOUT_MS").unwrap_or(sshq_adapters::DEFAULT_CONNECT_TIMEOUT)
}

/// Exit after this long with no requests and nothing running
/// (`SSHQ_DAEMON_IDLE_MS`). Unset means run until stopped.
pub fn idle_timeout() -> Option<Duration> {
    millis("SSHQ_DAEMON_IDLE_MS")
}

/// How long shutdown waits for cancelled commands to wind down
/// (default 10s, `SSHQ_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    millis("SSHQ_DRAIN_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
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
