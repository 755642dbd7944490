// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration: timings, the ssh client, and the host inventory.
//!
//! ```toml
//! wait_timeout = 30000      # ms
//! poll_interval = 500       # ms
//! connect_timeout = 10000   # ms
//! ssh_program = "ssh"
//! log_file = "/var/log/sshq.log"
//!
//! [[hosts]]
//! group = "prod"
//! name = "web1"
//! connection = "deploy@10.0.0.5:2222"
//!
//! [[hosts]]
//! group = "dev"
//! name = "here"
//! transport = "local"
//! ```

use serde::Deserialize;
use sshq_core::{HostId, HostIdError, HostTarget, Transport};
use sshq_engine::{WaitOptions, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::env;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = sshq_adapters::DEFAULT_CONNECT_TIMEOUT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("hosts[{index}]: {source}")]
    Host { index: usize, source: HostIdError },

    #[error("hosts[{index}]: {reason}")]
    Entry { index: usize, reason: String },

    #[error("duplicate host {0}")]
    DuplicateHost(HostId),

    #[error("{0} must be > 0")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    wait_timeout: Option<u64>,
    poll_interval: Option<u64>,
    connect_timeout: Option<u64>,
    ssh_program: Option<String>,
    log_file: Option<PathBuf>,
    #[serde(default)]
    hosts: Vec<HostEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostEntry {
    group: String,
    #[serde(default)]
    name: String,
    connection: Option<String>,
    #[serde(default)]
    transport: Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File the config came from; `None` when running on defaults.
    pub source: Option<PathBuf>,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub ssh_program: String,
    pub log_file: Option<PathBuf>,
    pub hosts: Vec<HostTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ssh_program: "ssh".to_string(),
            log_file: None,
            hosts: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `explicit`, else the environment's config path.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// defaults with an empty inventory. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match env::config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut config = Self::parse(&text)
            .map_err(|e| match e {
                ParseFailure::Toml(source) => ConfigError::Parse { path: path.to_path_buf(), source },
                ParseFailure::Invalid(e) => e,
            })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, ParseFailure> {
        let raw: RawConfig = toml::from_str(text).map_err(ParseFailure::Toml)?;
        let hosts = build_hosts(raw.hosts).map_err(ParseFailure::Invalid)?;
        let defaults = Self::default();
        Ok(Self {
            source: None,
            wait_timeout: millis(raw.wait_timeout, "wait_timeout", defaults.wait_timeout)?,
            poll_interval: millis(raw.poll_interval, "poll_interval", defaults.poll_interval)?,
            connect_timeout: millis(
                raw.connect_timeout,
                "connect_timeout",
                defaults.connect_timeout,
            )?,
            ssh_program: raw.ssh_program.unwrap_or(defaults.ssh_program),
            log_file: raw.log_file,
            hosts,
        })
    }

    fn apply_env(&mut self) {
        if let Some(timeout) = env::wait_timeout() {
            self.wait_timeout = timeout;
        }
        if let Some(interval) = env::poll_interval() {
            self.poll_interval = interval;
        }
        if let Some(timeout) = env::connect_timeout() {
            self.connect_timeout = timeout;
        }
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions { timeout: self.wait_timeout, poll_interval: self.poll_interval }
    }

    /// Distinct group names in configuration order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.hosts.iter().map(|h| h.group()).filter(|g| seen.insert(*g)).collect()
    }
}

#[derive(Debug)]
enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn millis(raw: Option<u64>, key: &'static str, default: Duration) -> Result<Duration, ParseFailure> {
    match raw {
        Some(0) => Err(ParseFailure::Invalid(ConfigError::ZeroDuration(key))),
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Ok(default),
    }
}

fn build_hosts(entries: Vec<HostEntry>) -> Result<Vec<HostTarget>, ConfigError> {
    let mut seen = HashSet::new();
    let mut hosts = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.group.is_empty() {
            return Err(ConfigError::Entry { index, reason: "group must not be empty".into() });
        }
        let target = match (entry.transport, entry.connection) {
            (Transport::Ssh, Some(connection)) => {
                HostTarget::from_connection_string(entry.group, entry.name, &connection)
                    .map_err(|source| ConfigError::Host { index, source })?
            }
            (Transport::Ssh, None) => {
                return Err(ConfigError::Entry {
                    index,
                    reason: "ssh hosts need a connection string".into(),
                })
            }
            (Transport::Local, Some(_)) => {
                return Err(ConfigError::Entry {
                    index,
                    reason: "local hosts take no connection string".into(),
                })
            }
            (Transport::Local, None) if entry.name.is_empty() => {
                return Err(ConfigError::Entry { index, reason: "local hosts need a name".into() })
            }
            (Transport::Local, None) => HostTarget::local(entry.group, entry.name),
        };
        if !seen.insert(target.id.clone()) {
            return Err(ConfigError::DuplicateHost(target.id));
        }
        hosts.push(target);
    }
    Ok(hosts)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
