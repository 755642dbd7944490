// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for engine unit tests.

use crate::{Command, CommandRunner};
use sshq_adapters::FakeConnector;
use sshq_core::{Clock, CommandSnapshot, FakeClock};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn fake_runner(connector: &FakeConnector) -> CommandRunner<FakeClock> {
    CommandRunner::with_clock(Arc::new(connector.clone()), FakeClock::new())
}

/// Poll until the command is terminal. Panics after 10s.
pub(crate) async fn settle<C: Clock>(command: &Command<C>) -> CommandSnapshot {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if command.status().is_terminal() {
                return command.snapshot();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("command did not finish")
}

/// Poll until `host` has published exactly `output`. Panics after 10s.
pub(crate) async fn wait_for_output<C: Clock>(command: &Command<C>, host: &str, output: &str) {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let snapshot = command.snapshot();
            if snapshot.results.get(host).is_some_and(|r| r.output == output) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("output never arrived")
}
