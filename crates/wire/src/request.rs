// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use sshq_core::HostTarget;

/// Request from CLI to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Create a command and start it on every target
    Run { command: String, targets: Vec<HostTarget> },

    /// Wait for a command to finish, at most `timeout_ms`
    Wait { id: String, timeout_ms: u64, poll_interval_ms: u64 },

    /// Snapshot of one command, or the most recent when `id` is absent
    Get {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Summaries newest first, optionally filtered by status name
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },

    /// Cancel one running command
    Cancel { id: String },

    /// Cancel everything and stop the daemon
    Shutdown,

    /// Daemon uptime and command counts
    Status,
}
