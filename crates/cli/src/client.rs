// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the `sshqd` daemon.
//!
//! One request per connection. Every method maps the daemon's reply to a
//! typed result, and anything unexpected becomes a [`ClientError`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use sshq_core::{CommandSnapshot, CommandSummary, HostTarget};
use sshq_engine::WaitOptions;
use sshq_wire::{self as wire, ProtocolError, RejectKind, Request, Response, WaitState};
use thiserror::Error;
use tokio::net::UnixStream;

use crate::env;
use crate::exit_error::{ExitError, EXIT_FAILED};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    NotRunning,

    #[error("could not determine state directory (set SSHQ_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("failed to start daemon: {0}")]
    StartFailed(String),

    #[error("{message}")]
    Rejected { kind: RejectKind, message: String },

    #[error("unexpected response from daemon: {0}")]
    Unexpected(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::NotRunning)
    }

    /// Exit code mapping: bad ids and filters are usage errors, wrong-state
    /// requests are plain failures.
    pub fn into_exit(self) -> anyhow::Error {
        match self {
            ClientError::Rejected { kind: RejectKind::Invalid, message } => {
                ExitError::usage(message).into()
            }
            ClientError::Rejected { kind: RejectKind::Conflict, message } => {
                ExitError::new(EXIT_FAILED, message).into()
            }
            other => other.into(),
        }
    }
}

/// Daemon uptime and registry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub commands: usize,
    pub running: usize,
}

#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { socket_path: socket_path.into(), timeout }
    }

    /// Client for the daemon socket under the state directory.
    pub fn from_env() -> Result<Self, ClientError> {
        let state_dir = env::state_dir().ok_or(ClientError::NoStateDir)?;
        Ok(Self::new(state_dir.join("daemon.sock"), env::ipc_timeout()))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, self.timeout).await
    }

    /// Send one request and wait up to `timeout` for the reply.
    async fn send_with_timeout(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = match UnixStream::connect(&self.socket_path).await {
            Ok(stream) => stream,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
                ) =>
            {
                return Err(ClientError::NotRunning)
            }
            Err(e) => return Err(e.into()),
        };
        let (mut reader, mut writer) = stream.into_split();
        wire::write_request(&mut writer, request, self.timeout).await?;
        let response = wire::read_response(&mut reader, timeout).await?;
        if let Response::Error { kind, message } = response {
            return Err(ClientError::Rejected { kind, message });
        }
        Ok(response)
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        Err(ClientError::Unexpected(format!("{:?}", response)))
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Self::reject(other),
        }
    }

    /// Daemon protocol version via the Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: wire::PROTOCOL_VERSION.to_string() };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Self::reject(other),
        }
    }

    /// Create and start a command; returns as soon as it is dispatched.
    pub async fn run(
        &self,
        command: &str,
        targets: Vec<HostTarget>,
    ) -> Result<CommandSummary, ClientError> {
        let request = Request::Run { command: command.to_string(), targets };
        match self.send(&request).await? {
            Response::Started { summary } => Ok(summary),
            other => Self::reject(other),
        }
    }

    /// Bounded wait. The connection stays open for the whole wait, so the
    /// read timeout covers it plus the usual IPC allowance.
    pub async fn wait(
        &self,
        id: &str,
        options: WaitOptions,
    ) -> Result<(WaitState, CommandSnapshot), ClientError> {
        let request = Request::Wait {
            id: id.to_string(),
            timeout_ms: millis(options.timeout),
            poll_interval_ms: millis(options.poll_interval),
        };
        match self.send_with_timeout(&request, options.timeout.saturating_add(self.timeout)).await? {
            Response::Waited { state, snapshot } => Ok((state, *snapshot)),
            other => Self::reject(other),
        }
    }

    /// One command's snapshot, or the most recent command's.
    pub async fn get(&self, id: Option<&str>) -> Result<CommandSnapshot, ClientError> {
        match self.send(&Request::Get { id: id.map(str::to_string) }).await? {
            Response::Command { snapshot } => Ok(*snapshot),
            other => Self::reject(other),
        }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<CommandSummary>, ClientError> {
        match self.send(&Request::List { status: status.map(str::to_string) }).await? {
            Response::Commands { commands } => Ok(commands),
            other => Self::reject(other),
        }
    }

    pub async fn cancel(&self, id: &str) -> Result<(), ClientError> {
        match self.send(&Request::Cancel { id: id.to_string() }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { uptime_secs, commands, running } => {
                Ok(DaemonStatus { uptime_secs, commands, running })
            }
            other => Self::reject(other),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Self::reject(other),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
