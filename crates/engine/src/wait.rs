// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded wait for a command to finish.
//!
//! The deadline bounds how long the caller waits, never how long the command
//! runs: on timeout the caller gets the current snapshot and the command
//! keeps going in the background.

use sshq_core::{Clock, CommandId, CommandSnapshot};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::command::Command;

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of one [`Poller::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time to check again
    Ready,
    /// The deadline has passed
    Timeout,
    /// The caller gave up
    Interrupted,
}

/// Fixed-interval ticker with an optional deadline and an abort signal.
pub struct Poller {
    interval: Duration,
    deadline: Option<Instant>,
    abort: CancellationToken,
}

impl Poller {
    /// `timeout: None` ticks until aborted.
    pub fn new(interval: Duration, timeout: Option<Duration>, abort: CancellationToken) -> Self {
        Self { interval, deadline: timeout.map(|t| Instant::now() + t), abort }
    }

    /// Sleep one interval, cut short at the deadline.
    ///
    /// The tick that lands on the deadline is still `Ready` so the caller gets
    /// a last look; the next one is `Timeout`.
    pub async fn tick(&mut self) -> Tick {
        if self.abort.is_cancelled() {
            return Tick::Interrupted;
        }
        let now = Instant::now();
        let mut wake = now + self.interval;
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                return Tick::Timeout;
            }
            wake = wake.min(deadline);
        }
        tokio::select! {
            biased;
            _ = self.abort.cancelled() => Tick::Interrupted,
            _ = tokio::time::sleep_until(wake) => Tick::Ready,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self { timeout: DEFAULT_WAIT_TIMEOUT, poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Reached a terminal status within the deadline
    Finished(CommandSnapshot),
    /// Deadline passed; the command continues in the background
    StillRunning(CommandSnapshot),
    /// The caller's request was cancelled first
    Aborted(CommandId),
}

impl WaitOutcome {
    pub fn snapshot(&self) -> Option<&CommandSnapshot> {
        match self {
            WaitOutcome::Finished(s) | WaitOutcome::StillRunning(s) => Some(s),
            WaitOutcome::Aborted(_) => None,
        }
    }
}

/// Poll `command` until it is terminal, the timeout passes, or `abort` fires.
pub async fn wait_or_snapshot<C: Clock>(
    command: &Command<C>,
    options: WaitOptions,
    abort: &CancellationToken,
) -> WaitOutcome {
    let mut poller = Poller::new(options.poll_interval, Some(options.timeout), abort.clone());
    loop {
        if command.status().is_terminal() {
            return WaitOutcome::Finished(command.snapshot());
        }
        match poller.tick().await {
            Tick::Ready => continue,
            Tick::Timeout => {
                let snapshot = command.snapshot();
                tracing::debug!(
                    command_id = %command.id(),
                    status = %snapshot.status,
                    "wait deadline reached"
                );
                return if snapshot.status.is_terminal() {
                    WaitOutcome::Finished(snapshot)
                } else {
                    WaitOutcome::StillRunning(snapshot)
                };
            }
            Tick::Interrupted => return WaitOutcome::Aborted(command.id().clone()),
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
