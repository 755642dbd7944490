// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport seams: connect to a host, open an exec channel, run one command.
//!
//! The engine drives every transport through the same three steps, and maps
//! each step's failure to its own error text:
//!
//! 1. [`Connector::open`] establishes a [`Connection`] to the target
//! 2. [`Connection::new_channel`] opens an [`ExecChannel`] (a session)
//! 3. [`ExecChannel::start`] launches the command; stdout and stderr are
//!    then taken as independent byte streams and [`ExecChannel::wait`]
//!    reports how the remote process ended

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use sshq_core::HostTarget;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Raw byte stream from one side of a running command.
pub type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

/// Errors from the transport layer
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("{0}")]
    Connect(String),

    #[error("{0}")]
    Session(String),

    #[error("{0}")]
    Start(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// How a started command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// Non-zero exit status
    Code(i32),
    /// Terminated by the named signal
    Signal(String),
    /// The transport lost track of the process
    Lost(String),
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Success)
    }

    /// Map a local process status.
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        if status.success() {
            return ExitOutcome::Success;
        }
        if let Some(code) = status.code() {
            return ExitOutcome::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                let name = nix::sys::signal::Signal::try_from(signal)
                    .map(|s| s.as_str().trim_start_matches("SIG").to_string())
                    .unwrap_or_else(|_| signal.to_string());
                return ExitOutcome::Signal(name);
            }
        }
        ExitOutcome::Lost(format!("unrecognized exit status: {}", status))
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Success => f.write_str("exit status 0"),
            ExitOutcome::Code(code) => write!(f, "exit status {}", code),
            ExitOutcome::Signal(name) => write!(f, "terminated by signal {}", name),
            ExitOutcome::Lost(reason) => f.write_str(reason),
        }
    }
}

/// Opens connections to hosts.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn open(&self, target: &HostTarget) -> Result<Box<dyn Connection>, ConnectError>;
}

/// An established connection to one host.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn new_channel(&self) -> Result<Box<dyn ExecChannel>, ConnectError>;

    /// Release the connection. Idempotent.
    async fn close(&self);
}

/// A single command execution on an open connection.
#[async_trait]
pub trait ExecChannel: Send + Sync {
    async fn start(&mut self, command: &str) -> Result<(), ConnectError>;

    /// Stdout of the started command. Yields `Some` at most once.
    fn take_stdout(&mut self) -> Option<OutputStream>;

    /// Stderr of the started command. Yields `Some` at most once.
    fn take_stderr(&mut self) -> Option<OutputStream>;

    /// Ask the running command to stop (SIGTERM or the transport's equivalent).
    async fn interrupt(&self);

    /// Wait for the command to end.
    async fn wait(&self) -> ExitOutcome;

    /// Tear down the channel, killing the command if it is still alive. Idempotent.
    async fn close(&self);
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
