// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TransportRouter: delegates `open` to the connector for the target's transport.

use async_trait::async_trait;
use sshq_core::{HostTarget, Transport};
use std::sync::Arc;

use crate::connection::{ConnectError, Connection, Connector};
use crate::local::LocalConnector;
use crate::ssh::SshConnector;

#[derive(Clone)]
pub struct TransportRouter {
    ssh: Arc<dyn Connector>,
    local: Arc<dyn Connector>,
}

impl TransportRouter {
    pub fn new(ssh: SshConnector, local: LocalConnector) -> Self {
        Self { ssh: Arc::new(ssh), local: Arc::new(local) }
    }

    /// Router over arbitrary connectors.
    pub fn from_parts(ssh: Arc<dyn Connector>, local: Arc<dyn Connector>) -> Self {
        Self { ssh, local }
    }

    fn route(&self, transport: Transport) -> &Arc<dyn Connector> {
        match transport {
            Transport::Ssh => &self.ssh,
            Transport::Local => &self.local,
        }
    }
}

impl Default for TransportRouter {
    fn default() -> Self {
        Self::new(SshConnector::default(), LocalConnector::default())
    }
}

#[async_trait]
impl Connector for TransportRouter {
    async fn open(&self, target: &HostTarget) -> Result<Box<dyn Connection>, ConnectError> {
        self.route(target.transport).open(target).await
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
