// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local transport: runs the command on this machine through `sh -c`.

use async_trait::async_trait;
use sshq_core::HostTarget;

use crate::connection::{ConnectError, Connection, Connector, ExecChannel};
use crate::process::ProcessChannel;

#[derive(Debug, Clone)]
pub struct LocalConnector {
    shell: String,
}

impl Default for LocalConnector {
    fn default() -> Self {
        Self { shell: "sh".to_string() }
    }
}

impl LocalConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

#[async_trait]
impl Connector for LocalConnector {
    async fn open(&self, target: &HostTarget) -> Result<Box<dyn Connection>, ConnectError> {
        tracing::debug!(host = %target.id, shell = %self.shell, "local connection");
        Ok(Box::new(LocalConnection { shell: self.shell.clone() }))
    }
}

struct LocalConnection {
    shell: String,
}

#[async_trait]
impl Connection for LocalConnection {
    async fn new_channel(&self) -> Result<Box<dyn ExecChannel>, ConnectError> {
        Ok(Box::new(ProcessChannel::new(self.shell.clone(), vec!["-c".to_string()])))
    }

    async fn close(&self) {}
}
