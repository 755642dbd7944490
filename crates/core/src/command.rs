// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command lifecycle types shared by the engine and its callers.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::HostId;
use crate::id::CommandId;

/// Lifecycle state of a command.
///
/// `Pending` moves to `Running` once; `Running` moves to exactly one of the
/// three terminal states. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    CommandStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl CommandStatus {
    pub const ALL: [CommandStatus; 5] = [
        CommandStatus::Pending,
        CommandStatus::Running,
        CommandStatus::Completed,
        CommandStatus::Failed,
        CommandStatus::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandStatus::Completed | CommandStatus::Failed | CommandStatus::Cancelled)
    }
}

/// Rejected status filter text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status filter: must be one of pending, running, completed, failed, cancelled")]
pub struct StatusParseError(pub String);

impl FromStr for CommandStatus {
    type Err = StatusParseError;

    /// Exact, case-sensitive match on the lowercase status names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CommandStatus::Pending),
            "running" => Ok(CommandStatus::Running),
            "completed" => Ok(CommandStatus::Completed),
            "failed" => Ok(CommandStatus::Failed),
            "cancelled" => Ok(CommandStatus::Cancelled),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Outcome of running the command on one host.
///
/// `output` is the combined stdout and stderr in arrival order. While the
/// command runs it only ever grows. Once `error` is set the entry is final.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResult {
    pub host: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostResult {
    pub fn success(host: impl Into<String>, output: impl Into<String>) -> Self {
        Self { host: host.into(), output: output.into(), error: None }
    }

    pub fn failure(
        host: impl Into<String>,
        output: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self { host: host.into(), output: output.into(), error: Some(error.into()) }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Consistent point-in-time copy of a command, including per-host results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSnapshot {
    pub id: CommandId,
    pub status: CommandStatus,
    pub command: String,
    pub hosts: Vec<HostId>,
    pub results: HashMap<String, HostResult>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at_ms: Option<u64>,
}

impl CommandSnapshot {
    /// Results in target order. Hosts without an entry yet are skipped.
    pub fn ordered_results(&self) -> Vec<(&HostId, &HostResult)> {
        self.hosts
            .iter()
            .filter_map(|id| self.results.get(&id.name).map(|r| (id, r)))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.results.values().filter(|r| r.is_error()).count()
    }

    pub fn summary(&self) -> CommandSummary {
        CommandSummary {
            id: self.id.clone(),
            status: self.status,
            command: self.command.clone(),
            hosts: self.hosts.clone(),
            created_at_ms: self.created_at_ms,
            started_at_ms: self.started_at_ms,
            ended_at_ms: self.ended_at_ms,
        }
    }
}

/// Listing view of a command without per-host output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    pub id: CommandId,
    pub status: CommandStatus,
    pub command: String,
    pub hosts: Vec<HostId>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at_ms: Option<u64>,
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
