// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command: one multi-host invocation and its lifecycle.
//!
//! ```text
//! Pending ──start──▶ Running ──dispatch joins──▶ Completed | Failed | Cancelled
//! ```
//!
//! `start` returns as soon as the host executors are spawned. `cancel` only
//! raises the shared token; the move to `Cancelled` happens when dispatch
//! joins and sees it. All mutable state sits behind one lock that is never
//! held across an await.

use parking_lot::Mutex;
use sshq_adapters::Connector;
use sshq_core::{
    Clock, CommandId, CommandSnapshot, CommandStatus, CommandSummary, HostResult, HostTarget,
    SystemClock,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::executor::HostExecutor;

struct CommandState {
    status: CommandStatus,
    results: HashMap<String, HostResult>,
    started_at_ms: Option<u64>,
    ended_at_ms: Option<u64>,
    cancel: Option<CancellationToken>,
}

pub struct Command<C: Clock = SystemClock> {
    id: CommandId,
    text: String,
    targets: Vec<HostTarget>,
    created_at_ms: u64,
    seq: u64,
    clock: C,
    connector: Arc<dyn Connector>,
    state: Mutex<CommandState>,
}

impl<C: Clock> Command<C> {
    pub(crate) fn new(
        text: impl Into<String>,
        targets: Vec<HostTarget>,
        seq: u64,
        clock: C,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            id: CommandId::new(),
            text: text.into(),
            targets,
            created_at_ms: clock.epoch_ms(),
            seq,
            clock,
            connector,
            state: Mutex::new(CommandState {
                status: CommandStatus::Pending,
                results: HashMap::new(),
                started_at_ms: None,
                ended_at_ms: None,
                cancel: None,
            }),
        }
    }

    pub fn id(&self) -> &CommandId {
        &self.id
    }

    pub fn command(&self) -> &str {
        &self.text
    }

    pub fn targets(&self) -> &[HostTarget] {
        &self.targets
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Registry creation order, used to break `created_at_ms` ties.
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub fn status(&self) -> CommandStatus {
        self.state.lock().status
    }

    /// Move `Pending` to `Running` and spawn one executor per target.
    ///
    /// Must be called from within a Tokio runtime. Returns without waiting
    /// for any host.
    pub fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let cancel = {
            let mut state = self.state.lock();
            if state.status != CommandStatus::Pending {
                return Err(EngineError::NotPending(state.status));
            }
            let cancel = CancellationToken::new();
            state.cancel = Some(cancel.clone());
            state.status = CommandStatus::Running;
            state.started_at_ms = Some(self.clock.epoch_ms());
            cancel
        };

        tracing::info!(
            command_id = %self.id,
            hosts = self.targets.len(),
            command = %self.text,
            "command started"
        );
        runtime.spawn(Arc::clone(self).dispatch(cancel));
        Ok(())
    }

    /// Raise the cancellation signal for every host still in flight.
    pub fn cancel(&self) -> Result<(), EngineError> {
        let state = self.state.lock();
        match (&state.status, &state.cancel) {
            (CommandStatus::Running, Some(cancel)) => {
                cancel.cancel();
                tracing::info!(command_id = %self.id, "cancellation requested");
                Ok(())
            }
            (status, _) => Err(EngineError::NotRunning(*status)),
        }
    }

    pub fn snapshot(&self) -> CommandSnapshot {
        let state = self.state.lock();
        CommandSnapshot {
            id: self.id.clone(),
            status: state.status,
            command: self.text.clone(),
            hosts: self.targets.iter().map(|t| t.id.clone()).collect(),
            results: state.results.clone(),
            created_at_ms: self.created_at_ms,
            started_at_ms: state.started_at_ms,
            ended_at_ms: state.ended_at_ms,
        }
    }

    pub fn summary(&self) -> CommandSummary {
        let state = self.state.lock();
        CommandSummary {
            id: self.id.clone(),
            status: state.status,
            command: self.text.clone(),
            hosts: self.targets.iter().map(|t| t.id.clone()).collect(),
            created_at_ms: self.created_at_ms,
            started_at_ms: state.started_at_ms,
            ended_at_ms: state.ended_at_ms,
        }
    }

    /// Replace a host's live output with newer accumulated text.
    ///
    /// Ignored once the host has a final result or the text would shrink.
    pub(crate) fn publish(&self, host: &str, output: String) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        let entry = state
            .results
            .entry(host.to_string())
            .or_insert_with(|| HostResult::success(host, String::new()));
        if entry.error.is_none() && output.len() >= entry.output.len() {
            entry.output = output;
        }
    }

    /// Store a host's final result.
    pub(crate) fn record(&self, result: HostResult) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        state.results.insert(result.host.clone(), result);
    }

    async fn dispatch(self: Arc<Self>, cancel: CancellationToken) {
        let mut executors = JoinSet::new();
        for target in &self.targets {
            let executor = HostExecutor::new(Arc::clone(&self), target.clone(), cancel.clone());
            executors.spawn(executor.run());
        }
        while let Some(joined) = executors.join_next().await {
            if let Err(e) = joined {
                tracing::error!(command_id = %self.id, error = %e, "host executor aborted");
            }
        }
        self.finish(&cancel);
    }

    /// The token is read under the state lock, the same lock `cancel` holds
    /// while firing it, so an accepted cancel always ends `Cancelled`.
    fn finish(&self, cancel: &CancellationToken) {
        let mut state = self.state.lock();
        let cancelled = cancel.is_cancelled();
        for target in &self.targets {
            state.results.entry(target.name().to_string()).or_insert_with(|| {
                HostResult::failure(target.name(), "", "host executor aborted")
            });
        }
        let status = final_status(cancelled, &state.results);
        state.status = status;
        state.ended_at_ms = Some(self.clock.epoch_ms());
        let errors = state.results.values().filter(|r| r.is_error()).count();
        drop(state);

        tracing::info!(command_id = %self.id, %status, errors, "command finished");
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn set_status_for_test(&self, status: CommandStatus) {
        self.state.lock().status = status;
    }
}

/// Aggregate status once every host has reported.
///
/// Cancellation wins over any per-host outcome, then a single host error
/// fails the whole command.
pub(crate) fn final_status(cancelled: bool, results: &HashMap<String, HostResult>) -> CommandStatus {
    if cancelled {
        CommandStatus::Cancelled
    } else if results.values().any(HostResult::is_error) {
        CommandStatus::Failed
    } else {
        CommandStatus::Completed
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
