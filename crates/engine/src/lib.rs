// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sshq-engine: background execution of one command across many hosts
//!
//! A [`Command`] owns one multi-host invocation and its state machine. The
//! [`CommandRunner`] registry creates and tracks commands, and
//! [`wait_or_snapshot`] gives callers a bounded wait that leaves slow
//! commands running in the background.

mod command;
mod error;
mod executor;
mod output;
mod runner;
mod wait;

#[cfg(test)]
mod test_helpers;

pub use command::Command;
pub use error::EngineError;
pub use executor::{
    CANCELLED_ERROR, CONNECT_ERROR_PREFIX, EXEC_ERROR_PREFIX, SESSION_ERROR_PREFIX,
    START_ERROR_PREFIX,
};
pub use runner::{CommandRunner, Runner};
pub use wait::{
    wait_or_snapshot, Poller, Tick, WaitOptions, WaitOutcome, DEFAULT_POLL_INTERVAL,
    DEFAULT_WAIT_TIMEOUT,
};

#[cfg(any(test, feature = "test-support"))]
pub use runner::{FakeRunner, RunnerCall};
