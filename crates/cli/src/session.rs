// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one command from creation to the snapshot the CLI reports.
//!
//! The command lives in the daemon; this side only starts it and watches.

use std::time::Duration;

use sshq_core::{CommandSnapshot, CommandStatus, HostTarget};
use sshq_engine::{Poller, Tick, WaitOptions};
use sshq_wire::{RejectKind, WaitState};
use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, DaemonClient};
use crate::exit_error::{EXIT_CANCELLED, EXIT_FAILED, EXIT_INTERRUPTED, EXIT_STILL_RUNNING};

/// How long an interrupted run waits for hosts to wind down.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Finished(CommandSnapshot),
    StillRunning(CommandSnapshot),
    Interrupted(CommandSnapshot),
}

impl RunOutcome {
    pub fn snapshot(&self) -> &CommandSnapshot {
        match self {
            RunOutcome::Finished(s) | RunOutcome::StillRunning(s) | RunOutcome::Interrupted(s) => s,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Finished(s) => status_exit_code(s.status),
            RunOutcome::StillRunning(_) => EXIT_STILL_RUNNING,
            RunOutcome::Interrupted(_) => EXIT_INTERRUPTED,
        }
    }
}

/// Exit code for a command observed in `status`.
pub fn status_exit_code(status: CommandStatus) -> i32 {
    match status {
        CommandStatus::Completed => 0,
        CommandStatus::Cancelled => EXIT_CANCELLED,
        CommandStatus::Failed => EXIT_FAILED,
        CommandStatus::Pending | CommandStatus::Running => EXIT_STILL_RUNNING,
    }
}

pub struct RunSession<'a> {
    client: &'a DaemonClient,
    options: WaitOptions,
    interrupt: CancellationToken,
}

impl<'a> RunSession<'a> {
    pub fn new(client: &'a DaemonClient, options: WaitOptions, interrupt: CancellationToken) -> Self {
        Self { client, options, interrupt }
    }

    /// Start the command and wait at most `options.timeout` for it.
    ///
    /// Past the deadline the command keeps running in the daemon.
    pub async fn run(
        &self,
        command: &str,
        targets: Vec<HostTarget>,
    ) -> Result<RunOutcome, ClientError> {
        let id = self.client.run(command, targets).await?.id.to_string();
        tokio::select! {
            waited = self.client.wait(&id, self.options) => Ok(match waited? {
                (WaitState::Finished, s) => RunOutcome::Finished(s),
                (WaitState::StillRunning, s) => RunOutcome::StillRunning(s),
            }),
            _ = self.interrupt.cancelled() => self.settle(&id).await,
        }
    }

    /// Start the command and report every snapshot until it is terminal.
    pub async fn follow(
        &self,
        command: &str,
        targets: Vec<HostTarget>,
        mut on_update: impl FnMut(&CommandSnapshot),
    ) -> Result<RunOutcome, ClientError> {
        let id = self.client.run(command, targets).await?.id.to_string();
        let mut poller = Poller::new(self.options.poll_interval, None, self.interrupt.clone());
        loop {
            let snapshot = self.client.get(Some(&id)).await?;
            on_update(&snapshot);
            if snapshot.status.is_terminal() {
                return Ok(RunOutcome::Finished(snapshot));
            }
            if poller.tick().await == Tick::Interrupted {
                return self.settle(&id).await;
            }
        }
    }

    /// Cancel this run's command and give its hosts a bounded grace period.
    async fn settle(&self, id: &str) -> Result<RunOutcome, ClientError> {
        tracing::info!(command_id = id, "interrupted, cancelling command");
        match self.client.cancel(id).await {
            // Finished while the interrupt was in flight.
            Err(ClientError::Rejected { kind: RejectKind::Conflict, .. }) | Ok(()) => {}
            Err(e) => return Err(e),
        }
        let grace = WaitOptions { timeout: SETTLE_TIMEOUT, poll_interval: self.options.poll_interval };
        let (_, snapshot) = self.client.wait(id, grace).await?;
        Ok(RunOutcome::Interrupted(snapshot))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
