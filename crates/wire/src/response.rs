// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use sshq_core::{CommandSnapshot, CommandSummary};

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Ping response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Command created and dispatched
    Started { summary: CommandSummary },

    /// Point-in-time copy of one command
    Command { snapshot: Box<CommandSnapshot> },

    /// Result of a bounded wait
    Waited { state: WaitState, snapshot: Box<CommandSnapshot> },

    /// Listing, newest first
    Commands { commands: Vec<CommandSummary> },

    /// Daemon status
    Status { uptime_secs: u64, commands: usize, running: usize },

    /// Shutdown accepted
    ShuttingDown,

    /// The daemon refused or could not serve the request
    Error { kind: RejectKind, message: String },
}

/// How a bounded wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    Finished,
    StillRunning,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectKind {
    /// Bad id, unknown filter, or an empty registry
    Invalid,
    /// The command exists but is in the wrong state
    Conflict,
    /// Daemon-side failure
    Internal,
}

impl Response {
    pub fn error(kind: RejectKind, message: impl Into<String>) -> Self {
        Response::Error { kind, message: message.into() }
    }
}
