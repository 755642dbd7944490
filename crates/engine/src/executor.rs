// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host executor: drives one connection through one command.
//!
//! Every failure ends up as text on that host's [`HostResult`]; nothing here
//! propagates to sibling hosts or to the command.

use sshq_adapters::{Connection, ExecChannel, ExitOutcome, OutputStream};
use sshq_core::{Clock, HostResult, HostTarget};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::command::Command;
use crate::output::OutputBuffer;

pub const CONNECT_ERROR_PREFIX: &str = "failed to connect";
pub const SESSION_ERROR_PREFIX: &str = "failed to create session";
pub const START_ERROR_PREFIX: &str = "failed to start command";
pub const EXEC_ERROR_PREFIX: &str = "command failed";
pub const CANCELLED_ERROR: &str = "command cancelled";

const READ_CHUNK: usize = 4096;

pub(crate) struct HostExecutor<C: Clock> {
    command: Arc<Command<C>>,
    target: HostTarget,
    cancel: CancellationToken,
}

impl<C: Clock> HostExecutor<C> {
    pub(crate) fn new(command: Arc<Command<C>>, target: HostTarget, cancel: CancellationToken) -> Self {
        Self { command, target, cancel }
    }

    pub(crate) async fn run(self) {
        let result = self.execute().await;
        if let Some(error) = &result.error {
            tracing::warn!(
                command_id = %self.command.id(),
                host = %self.target.id,
                error = %error,
                "host failed"
            );
        } else {
            tracing::debug!(command_id = %self.command.id(), host = %self.target.id, "host completed");
        }
        self.command.record(result);
    }

    async fn execute(&self) -> HostResult {
        let host = self.target.name();
        if self.cancel.is_cancelled() {
            return HostResult::failure(host, "", CANCELLED_ERROR);
        }

        tracing::debug!(command_id = %self.command.id(), host = %self.target.id, "connecting");
        let connection = match self.command.connector().open(&self.target).await {
            Ok(connection) => connection,
            Err(e) => {
                return HostResult::failure(host, "", format!("{}: {}", CONNECT_ERROR_PREFIX, e))
            }
        };

        let result = self.run_on(connection.as_ref()).await;
        connection.close().await;
        result
    }

    async fn run_on(&self, connection: &dyn Connection) -> HostResult {
        let host = self.target.name();
        let mut channel = match connection.new_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                return HostResult::failure(host, "", format!("{}: {}", SESSION_ERROR_PREFIX, e))
            }
        };

        if let Err(e) = channel.start(self.command.command()).await {
            channel.close().await;
            return HostResult::failure(host, "", format!("{}: {}", START_ERROR_PREFIX, e));
        }
        tracing::debug!(command_id = %self.command.id(), host = %self.target.id, "command running");

        let stdout = channel.take_stdout();
        let stderr = channel.take_stderr();
        let buffer = OutputBuffer::default();
        let outcome = self.finish_or_cancel(channel.as_ref(), stdout, stderr, &buffer).await;

        let result = match outcome {
            Some(ExitOutcome::Success) => HostResult::success(host, buffer.text()),
            Some(outcome) => HostResult::failure(
                host,
                buffer.text(),
                format!("{}: {}", EXEC_ERROR_PREFIX, outcome),
            ),
            None => {
                channel.interrupt().await;
                let output = buffer.text();
                tracing::warn!(
                    command_id = %self.command.id(),
                    host = %self.target.id,
                    "interrupted remote command"
                );
                HostResult::failure(host, output, CANCELLED_ERROR)
            }
        };
        channel.close().await;
        result
    }

    /// Stream output until the command exits, or stop at cancellation (`None`).
    async fn finish_or_cancel(
        &self,
        channel: &dyn ExecChannel,
        stdout: Option<OutputStream>,
        stderr: Option<OutputStream>,
        buffer: &OutputBuffer,
    ) -> Option<ExitOutcome> {
        let completion = async {
            tokio::join!(self.pump(stdout, buffer), self.pump(stderr, buffer));
            channel.wait().await
        };
        tokio::select! {
            outcome = completion => Some(outcome),
            _ = self.cancel.cancelled() => None,
        }
    }

    async fn pump(&self, stream: Option<OutputStream>, buffer: &OutputBuffer) {
        let Some(mut stream) = stream else { return };
        let host = self.target.name();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => buffer.append(&chunk[..n], |text| self.command.publish(host, text)),
                Err(e) => {
                    tracing::debug!(
                        command_id = %self.command.id(),
                        host = %self.target.id,
                        error = %e,
                        "output stream ended with error"
                    );
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
