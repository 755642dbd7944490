// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of commands for the lifetime of the process.

use parking_lot::RwLock;
use sshq_adapters::Connector;
use sshq_core::{Clock, CommandId, CommandStatus, CommandSummary, HostTarget, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::command::Command;
use crate::error::EngineError;

/// Creates, finds and bulk-cancels commands.
pub trait Runner: Send + Sync + 'static {
    type Clock: Clock;

    /// Register a new `Pending` command.
    fn create(&self, command: &str, targets: Vec<HostTarget>) -> Arc<Command<Self::Clock>>;

    fn get(&self, id: &str) -> Result<Arc<Command<Self::Clock>>, EngineError>;

    /// Command with the latest creation time. Ties go to the one created last.
    fn most_recent(&self) -> Result<Arc<Command<Self::Clock>>, EngineError>;

    /// Summaries newest first, optionally only those with the given status.
    fn list(&self, status: Option<&str>) -> Result<Vec<CommandSummary>, EngineError>;

    /// Cancel every running command, skipping any that finish meanwhile.
    fn cancel_all(&self);
}

pub struct CommandRunner<C: Clock = SystemClock> {
    commands: RwLock<HashMap<CommandId, Arc<Command<C>>>>,
    connector: Arc<dyn Connector>,
    clock: C,
    next_seq: AtomicU64,
}

impl CommandRunner<SystemClock> {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_clock(connector, SystemClock)
    }
}

impl<C: Clock> CommandRunner<C> {
    pub fn with_clock(connector: Arc<dyn Connector>, clock: C) -> Self {
        Self {
            commands: RwLock::new(HashMap::new()),
            connector,
            clock,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    fn all(&self) -> Vec<Arc<Command<C>>> {
        self.commands.read().values().cloned().collect()
    }
}

impl<C: Clock> Runner for CommandRunner<C> {
    type Clock = C;

    fn create(&self, command: &str, targets: Vec<HostTarget>) -> Arc<Command<C>> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let cmd = Arc::new(Command::new(
            command,
            targets,
            seq,
            self.clock.clone(),
            Arc::clone(&self.connector),
        ));
        tracing::debug!(command_id = %cmd.id(), hosts = cmd.targets().len(), "command created");
        self.commands.write().insert(cmd.id().clone(), Arc::clone(&cmd));
        cmd
    }

    fn get(&self, id: &str) -> Result<Arc<Command<C>>, EngineError> {
        self.commands.read().get(id).cloned().ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    fn most_recent(&self) -> Result<Arc<Command<C>>, EngineError> {
        self.commands
            .read()
            .values()
            .max_by_key(|c| (c.created_at_ms(), c.seq()))
            .cloned()
            .ok_or(EngineError::NoCommands)
    }

    fn list(&self, status: Option<&str>) -> Result<Vec<CommandSummary>, EngineError> {
        let filter = status.map(str::parse::<CommandStatus>).transpose()?;
        let mut commands = self.all();
        commands.sort_by_key(|c| std::cmp::Reverse((c.created_at_ms(), c.seq())));
        Ok(commands
            .iter()
            .map(|c| c.summary())
            .filter(|s| filter.map_or(true, |f| s.status == f))
            .collect())
    }

    fn cancel_all(&self) {
        for cmd in self.all() {
            if cmd.status() != CommandStatus::Running {
                continue;
            }
            if let Err(e) = cmd.cancel() {
                tracing::debug!(command_id = %cmd.id(), error = %e, "skipped cancel");
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CommandRunner, Runner};
    use crate::command::Command;
    use crate::error::EngineError;
    use parking_lot::Mutex;
    use sshq_adapters::FakeConnector;
    use sshq_core::{CommandSummary, FakeClock, HostTarget};
    use std::sync::Arc;

    /// Recorded registry call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RunnerCall {
        Create { command: String, hosts: usize },
        Get(String),
        MostRecent,
        List(Option<String>),
        CancelAll,
    }

    /// Fake registry for testing.
    ///
    /// Runs commands through the real dispatch path against a
    /// [`FakeConnector`] and a [`FakeClock`], recording every call.
    #[derive(Clone)]
    pub struct FakeRunner {
        inner: Arc<CommandRunner<FakeClock>>,
        clock: FakeClock,
        calls: Arc<Mutex<Vec<RunnerCall>>>,
    }

    impl FakeRunner {
        pub fn new(connector: FakeConnector) -> Self {
            let clock = FakeClock::new();
            Self {
                inner: Arc::new(CommandRunner::with_clock(Arc::new(connector), clock.clone())),
                clock,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn clock(&self) -> &FakeClock {
            &self.clock
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<RunnerCall> {
            self.calls.lock().clone()
        }

        fn record(&self, call: RunnerCall) {
            self.calls.lock().push(call);
        }
    }

    impl Runner for FakeRunner {
        type Clock = FakeClock;

        fn create(&self, command: &str, targets: Vec<HostTarget>) -> Arc<Command<FakeClock>> {
            self.record(RunnerCall::Create { command: command.to_string(), hosts: targets.len() });
            self.inner.create(command, targets)
        }

        fn get(&self, id: &str) -> Result<Arc<Command<FakeClock>>, EngineError> {
            self.record(RunnerCall::Get(id.to_string()));
            self.inner.get(id)
        }

        fn most_recent(&self) -> Result<Arc<Command<FakeClock>>, EngineError> {
            self.record(RunnerCall::MostRecent);
            self.inner.most_recent()
        }

        fn list(&self, status: Option<&str>) -> Result<Vec<CommandSummary>, EngineError> {
            self.record(RunnerCall::List(status.map(str::to_string)));
            self.inner.list(status)
        }

        fn cancel_all(&self) {
            self.record(RunnerCall::CancelAll);
            self.inner.cancel_all()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRunner, RunnerCall};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
