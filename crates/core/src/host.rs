// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host identifiers and resolved execution targets.
//!
//! A [`HostId`] is the `group:name` pair an operator uses to address a
//! machine. A [`HostTarget`] is what the engine actually dispatches to: the
//! identifier plus everything a transport needs to reach the machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Port used when a connection string does not name one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Errors from parsing host identifiers and connection strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostIdError {
    #[error("invalid host identifier format '{0}', expected 'group:name'")]
    InvalidHostId(String),

    #[error("invalid SSH connection string '{input}': {reason}")]
    InvalidConnectionString { input: String, reason: String },
}

/// Addressable identity of a host: its group and its name within the group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostId {
    pub group: String,
    pub name: String,
}

impl HostId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self { group: group.into(), name: name.into() }
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for HostId {
    type Err = HostIdError;

    /// Splits on the first colon only, so names may themselves contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, name)) => Ok(HostId::new(group, name)),
            None => Err(HostIdError::InvalidHostId(s.to_string())),
        }
    }
}

/// Parse a list of `group:name` identifiers, failing on the first bad entry.
pub fn parse_host_ids<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<HostId>, HostIdError> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

/// How a target is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Through the system OpenSSH client
    #[default]
    Ssh,
    /// On this machine, through `sh -c`
    Local,
}

crate::simple_display! {
    Transport {
        Ssh => "ssh",
        Local => "local",
    }
}

/// A fully resolved execution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTarget {
    pub id: HostId,
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub transport: Transport,
}

/// Test builder for [`HostTarget`]: an SSH target `test:host` at
/// `127.0.0.1:22`.
#[cfg(any(test, feature = "test-support"))]
pub struct HostTargetBuilder {
    target: HostTarget,
}

#[cfg(any(test, feature = "test-support"))]
impl HostTargetBuilder {
    pub fn id(mut self, id: HostId) -> Self {
        self.target.id = id;
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.target.address = address.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.target.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.target.user = Some(user.into());
        self
    }

    pub fn build(self) -> HostTarget {
        self.target
    }
}

#[cfg(any(test, feature = "test-support"))]
impl HostTarget {
    pub fn builder() -> HostTargetBuilder {
        HostTargetBuilder {
            target: HostTarget {
                id: HostId::new("test", "host"),
                address: "127.0.0.1".to_string(),
                port: DEFAULT_SSH_PORT,
                user: None,
                transport: Transport::Ssh,
            },
        }
    }
}

impl HostTarget {
    /// Build an SSH target from a connection string.
    ///
    /// Accepted forms: `ssh://user@host:port`, `user@host:port`, `host:port`
    /// and `host`. The port defaults to 22 and an empty `name` defaults to
    /// the host. Embedded passwords are rejected: authentication is left to
    /// the SSH agent and key files.
    pub fn from_connection_string(
        group: impl Into<String>,
        name: impl Into<String>,
        input: &str,
    ) -> Result<Self, HostIdError> {
        let invalid = |reason: &str| HostIdError::InvalidConnectionString {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let normalized =
            if input.contains("://") { input.to_string() } else { format!("ssh://{}", input) };
        let url = Url::parse(&normalized).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "ssh" {
            return Err(invalid("not ssh scheme"));
        }
        if url.password().is_some() {
            return Err(invalid("passwords are not supported, use an SSH agent or key file"));
        }
        let address = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(invalid("missing host")),
        };

        let user = Some(url.username()).filter(|u| !u.is_empty()).map(str::to_string);
        let mut name = name.into();
        if name.is_empty() {
            name = address.clone();
        }

        Ok(HostTarget {
            id: HostId::new(group, name),
            port: url.port().unwrap_or(DEFAULT_SSH_PORT),
            address,
            user,
            transport: Transport::Ssh,
        })
    }

    /// Target that runs commands on this machine.
    pub fn local(group: impl Into<String>, name: impl Into<String>) -> Self {
        HostTarget {
            id: HostId::new(group, name),
            address: "localhost".to_string(),
            port: 0,
            user: None,
            transport: Transport::Local,
        }
    }

    /// Host name used as the key of a command's result map.
    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn group(&self) -> &str {
        &self.id.group
    }

    /// `host:port` as dialed by the SSH transport.
    pub fn socket_addr(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
