// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process daemon on a temporary socket, backed by a fake registry.

use std::sync::Arc;
use std::time::Duration;

use sshq_adapters::FakeConnector;
use sshq_daemon::{ListenCtx, Listener};
use sshq_engine::FakeRunner;
use tempfile::TempDir;
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::client::DaemonClient;

pub(crate) struct TestDaemon {
    pub client: DaemonClient,
    pub runner: Arc<FakeRunner>,
    task: JoinHandle<()>,
    _dir: TempDir,
}

impl TestDaemon {
    pub(crate) fn start(connector: FakeConnector) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        let unix = UnixListener::bind(&socket).unwrap();
        let runner = Arc::new(FakeRunner::new(connector));
        let ctx = Arc::new(ListenCtx::new(Arc::clone(&runner), Arc::new(Notify::new())));
        let task = tokio::spawn(Listener::new(unix, ctx).run());
        Self { client: DaemonClient::new(socket, Duration::from_secs(5)), runner, task, _dir: dir }
    }
}

impl Drop for TestDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}
