// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sshq-core: shared types for the sshq remote command runner

pub mod macros;

pub mod clock;
pub mod command;
pub mod host;
pub mod id;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{CommandSnapshot, CommandStatus, CommandSummary, HostResult, StatusParseError};
#[cfg(any(test, feature = "test-support"))]
pub use host::HostTargetBuilder;
pub use host::{parse_host_ids, HostId, HostIdError, HostTarget, Transport, DEFAULT_SSH_PORT};
pub use id::CommandId;
