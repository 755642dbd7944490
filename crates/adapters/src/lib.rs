// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sshq-adapters: transports that carry a command to a host and stream its output back

pub mod connection;
pub mod local;
pub mod process;
pub mod router;
pub mod ssh;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

pub use connection::{ConnectError, Connection, Connector, ExecChannel, ExitOutcome, OutputStream};
pub use local::LocalConnector;
pub use process::ProcessChannel;
pub use router::TransportRouter;
pub use ssh::{SshConnector, DEFAULT_CONNECT_TIMEOUT};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeCall, FakeChunk, FakeConnector, FakeHost};
