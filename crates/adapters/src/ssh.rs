// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSH transport through the system OpenSSH client.
//!
//! `open` dials the target's TCP port to fail fast on unreachable hosts;
//! each channel then runs `ssh` in batch mode, so authentication comes from
//! the user's agent, keys and `~/.ssh/config`.

use async_trait::async_trait;
use sshq_core::HostTarget;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;

use crate::connection::{ConnectError, Connection, Connector, ExecChannel};
use crate::process::ProcessChannel;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SshConnector {
    program: String,
    connect_timeout: Duration,
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new("ssh", DEFAULT_CONNECT_TIMEOUT)
    }
}

impl SshConnector {
    pub fn new(program: impl Into<String>, connect_timeout: Duration) -> Self {
        Self { program: program.into(), connect_timeout }
    }
}

#[async_trait]
impl Connector for SshConnector {
    async fn open(&self, target: &HostTarget) -> Result<Box<dyn Connection>, ConnectError> {
        let addr = target.socket_addr();
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_stream)) => {}
            Ok(Err(e)) => return Err(ConnectError::Connect(format!("dial tcp {}: {}", addr, e))),
            Err(_) => {
                return Err(ConnectError::Connect(format!(
                    "dial tcp {}: timed out after {}s",
                    addr,
                    self.connect_timeout.as_secs()
                )))
            }
        }
        tracing::debug!(host = %target.id, %addr, "ssh target reachable");
        Ok(Box::new(SshConnection {
            args: ssh_args(target, self.connect_timeout),
            program: self.program.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

struct SshConnection {
    program: String,
    args: Vec<String>,
    closed: AtomicBool,
}

#[async_trait]
impl Connection for SshConnection {
    async fn new_channel(&self) -> Result<Box<dyn ExecChannel>, ConnectError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ConnectError::Session("connection closed".to_string()));
        }
        Ok(Box::new(ProcessChannel::new(self.program.clone(), self.args.clone())))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Arguments placed before the command text.
pub(crate) fn ssh_args(target: &HostTarget, connect_timeout: Duration) -> Vec<String> {
    let mut args = vec![
        "-T".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={}", connect_timeout.as_secs().max(1)),
        "-p".to_string(),
        target.port.to_string(),
    ];
    if let Some(user) = &target.user {
        args.push("-l".to_string());
        args.push(user.clone());
    }
    args.push(target.address.trim_start_matches('[').trim_end_matches(']').to_string());
    args.push("--".to_string());
    args
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
