// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted connector for tests.
//!
//! Each host name maps to a [`FakeHost`] script: which step fails, what the
//! command writes (and when), and how it exits. Every transport call is
//! recorded as a [`FakeCall`].

use async_trait::async_trait;
use parking_lot::Mutex;
use sshq_core::HostTarget;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;

use crate::connection::{ConnectError, Connection, Connector, ExecChannel, ExitOutcome, OutputStream};

/// Recorded transport call, keyed by host name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Open(String),
    NewChannel(String),
    Start { host: String, command: String },
    Interrupt(String),
    CloseChannel(String),
    CloseConnection(String),
}

/// One step of a scripted command's output.
#[derive(Debug, Clone)]
pub enum FakeChunk {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Delay(Duration),
    /// Block until the notify fires
    Gate(Arc<Notify>),
}

/// Script for one host.
#[derive(Debug, Clone)]
pub struct FakeHost {
    connect_delay: Option<Duration>,
    connect_error: Option<String>,
    channel_error: Option<String>,
    start_error: Option<String>,
    chunks: Vec<FakeChunk>,
    exit: ExitOutcome,
    hang: bool,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            connect_delay: None,
            connect_error: None,
            channel_error: None,
            start_error: None,
            chunks: Vec::new(),
            exit: ExitOutcome::Success,
            hang: false,
        }
    }
}

impl FakeHost {
    /// Writes `stdout` and exits 0.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::default().stdout(stdout)
    }

    /// Writes `stdout` and exits with `code`.
    pub fn exit_code(code: i32, stdout: impl Into<String>) -> Self {
        Self::default().stdout(stdout).exit(ExitOutcome::Code(code))
    }

    pub fn connect_failure(msg: impl Into<String>) -> Self {
        Self { connect_error: Some(msg.into()), ..Self::default() }
    }

    pub fn channel_failure(msg: impl Into<String>) -> Self {
        Self { channel_error: Some(msg.into()), ..Self::default() }
    }

    pub fn start_failure(msg: impl Into<String>) -> Self {
        Self { start_error: Some(msg.into()), ..Self::default() }
    }

    pub fn stdout(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.chunks.push(FakeChunk::Stdout(text.into_bytes()));
        }
        self
    }

    pub fn stderr(mut self, text: impl Into<String>) -> Self {
        self.chunks.push(FakeChunk::Stderr(text.into().into_bytes()));
        self
    }

    pub fn stdout_bytes(mut self, bytes: &[u8]) -> Self {
        self.chunks.push(FakeChunk::Stdout(bytes.to_vec()));
        self
    }

    pub fn delay(mut self, duration: Duration) -> Self {
        self.chunks.push(FakeChunk::Delay(duration));
        self
    }

    pub fn gate(mut self, gate: Arc<Notify>) -> Self {
        self.chunks.push(FakeChunk::Gate(gate));
        self
    }

    pub fn connect_delay(mut self, duration: Duration) -> Self {
        self.connect_delay = Some(duration);
        self
    }

    pub fn exit(mut self, outcome: ExitOutcome) -> Self {
        self.exit = outcome;
        self
    }

    /// After its output, keep the streams open until interrupted.
    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }
}

struct FakeState {
    hosts: HashMap<String, FakeHost>,
    calls: Vec<FakeCall>,
}

/// Fake connector for testing
#[derive(Clone)]
pub struct FakeConnector {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeConnector {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(FakeState { hosts: HashMap::new(), calls: Vec::new() })) }
    }
}

impl FakeConnector {
    /// Unscripted hosts succeed with no output.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(self, name: impl Into<String>, script: FakeHost) -> Self {
        self.inner.lock().hosts.insert(name.into(), script);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<FakeCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls for one host
    pub fn calls_for(&self, host: &str) -> Vec<FakeCall> {
        self.calls().into_iter().filter(|c| c.host() == host).collect()
    }

    fn record(&self, call: FakeCall) {
        self.inner.lock().calls.push(call);
    }
}

impl FakeCall {
    pub fn host(&self) -> &str {
        match self {
            FakeCall::Open(h)
            | FakeCall::NewChannel(h)
            | FakeCall::Interrupt(h)
            | FakeCall::CloseChannel(h)
            | FakeCall::CloseConnection(h) => h,
            FakeCall::Start { host, .. } => host,
        }
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn open(&self, target: &HostTarget) -> Result<Box<dyn Connection>, ConnectError> {
        let host = target.name().to_string();
        self.record(FakeCall::Open(host.clone()));
        let script = self.inner.lock().hosts.get(&host).cloned().unwrap_or_default();
        if let Some(delay) = script.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = &script.connect_error {
            return Err(ConnectError::Connect(msg.clone()));
        }
        Ok(Box::new(FakeConnection { connector: self.clone(), host, script }))
    }
}

struct FakeConnection {
    connector: FakeConnector,
    host: String,
    script: FakeHost,
}

#[async_trait]
impl Connection for FakeConnection {
    async fn new_channel(&self) -> Result<Box<dyn ExecChannel>, ConnectError> {
        self.connector.record(FakeCall::NewChannel(self.host.clone()));
        if let Some(msg) = &self.script.channel_error {
            return Err(ConnectError::Session(msg.clone()));
        }
        Ok(Box::new(FakeChannel::new(self.connector.clone(), self.host.clone(), self.script.clone())))
    }

    async fn close(&self) {
        self.connector.record(FakeCall::CloseConnection(self.host.clone()));
    }
}

struct FakeChannel {
    connector: FakeConnector,
    host: String,
    script: FakeHost,
    stdout: Option<DuplexStream>,
    stderr: Option<DuplexStream>,
    interrupted: CancellationToken,
    exit: Option<watch::Receiver<Option<ExitOutcome>>>,
}

impl FakeChannel {
    fn new(connector: FakeConnector, host: String, script: FakeHost) -> Self {
        Self {
            connector,
            host,
            script,
            stdout: None,
            stderr: None,
            interrupted: CancellationToken::new(),
            exit: None,
        }
    }
}

#[async_trait]
impl ExecChannel for FakeChannel {
    async fn start(&mut self, command: &str) -> Result<(), ConnectError> {
        self.connector
            .record(FakeCall::Start { host: self.host.clone(), command: command.to_string() });
        if let Some(msg) = &self.script.start_error {
            return Err(ConnectError::Start(msg.clone()));
        }

        let (mut out_tx, out_rx) = tokio::io::duplex(64 * 1024);
        let (mut err_tx, err_rx) = tokio::io::duplex(64 * 1024);
        self.stdout = Some(out_rx);
        self.stderr = Some(err_rx);

        let (exit_tx, exit_rx) = watch::channel(None);
        self.exit = Some(exit_rx);

        let chunks = self.script.chunks.clone();
        let hang = self.script.hang;
        let exit = self.script.exit.clone();
        let interrupted = self.interrupted.clone();
        tokio::spawn(async move {
            let script = async move {
                for chunk in chunks {
                    match chunk {
                        FakeChunk::Stdout(bytes) => {
                            let _ = out_tx.write_all(&bytes).await;
                        }
                        FakeChunk::Stderr(bytes) => {
                            let _ = err_tx.write_all(&bytes).await;
                        }
                        FakeChunk::Delay(d) => tokio::time::sleep(d).await,
                        FakeChunk::Gate(gate) => gate.notified().await,
                    }
                }
                if hang {
                    std::future::pending::<()>().await;
                }
            };
            let outcome = tokio::select! {
                _ = script => exit,
                _ = interrupted.cancelled() => ExitOutcome::Signal("TERM".to_string()),
            };
            let _ = exit_tx.send(Some(outcome));
        });
        Ok(())
    }

    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take().map(|s| Box::pin(s) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take().map(|s| Box::pin(s) as OutputStream)
    }

    async fn interrupt(&self) {
        self.connector.record(FakeCall::Interrupt(self.host.clone()));
        self.interrupted.cancel();
    }

    async fn wait(&self) -> ExitOutcome {
        let Some(rx) = &self.exit else {
            return ExitOutcome::Lost("channel not started".to_string());
        };
        let mut rx = rx.clone();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or(ExitOutcome::Success),
            Err(_) => ExitOutcome::Lost("fake channel dropped".to_string()),
        };
        outcome
    }

    async fn close(&self) {
        self.connector.record(FakeCall::CloseChannel(self.host.clone()));
        self.interrupted.cancel();
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
