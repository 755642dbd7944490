// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sshq_core::{CommandStatus, StatusParseError};
use thiserror::Error;

/// Errors returned synchronously by engine operations.
///
/// None of these mutate state. Per-host failures never surface here; they are
/// recorded as text on the host's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("command is not pending (status: {0})")]
    NotPending(CommandStatus),

    #[error("command is not running (status: {0})")]
    NotRunning(CommandStatus),

    #[error("command not found: {0}")]
    NotFound(String),

    #[error("no commands found")]
    NoCommands,

    #[error(transparent)]
    InvalidStatus(#[from] StatusParseError),

    #[error("no async runtime available to dispatch hosts")]
    NoRuntime,
}
