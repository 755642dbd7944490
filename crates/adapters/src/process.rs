// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exec channel backed by a local child process.
//!
//! Both real transports end in a child process: the SSH transport runs the
//! system `ssh` client, the local transport runs `sh -c`. The command text is
//! appended as the last argument.

use async_trait::async_trait;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::process::Stdio;
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::Mutex;

use crate::connection::{ConnectError, ExecChannel, ExitOutcome, OutputStream};

pub struct ProcessChannel {
    program: String,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
    pid: Option<u32>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
}

impl ProcessChannel {
    /// `args` are passed before the command text.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: Mutex::new(None),
            pid: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn signal(&self, signal: Signal) {
        let Some(pid) = self.pid else { return };
        // The child leads its own process group; signal the whole group so
        // grandchildren of `sh -c` stop too.
        if let Err(e) = killpg(Pid::from_raw(pid as i32), signal) {
            tracing::debug!(pid, signal = signal.as_str(), error = %e, "signal delivery failed");
        }
    }
}

#[async_trait]
impl ExecChannel for ProcessChannel {
    async fn start(&mut self, command: &str) -> Result<(), ConnectError> {
        if self.child.get_mut().is_some() {
            return Err(ConnectError::Start("channel already started".to_string()));
        }

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| ConnectError::Start(format!("{}: {}", self.program, e)))?;
        self.pid = child.id();
        self.stdout = child.stdout.take();
        self.stderr = child.stderr.take();
        *self.child.get_mut() = Some(child);
        tracing::debug!(program = %self.program, pid = ?self.pid, "process started");
        Ok(())
    }

    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take().map(|s| Box::pin(s) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take().map(|s| Box::pin(s) as OutputStream)
    }

    async fn interrupt(&self) {
        self.signal(Signal::SIGTERM);
    }

    async fn wait(&self) -> ExitOutcome {
        let mut guard = self.child.lock().await;
        let Some(child) = guard.as_mut() else {
            return ExitOutcome::Lost("process not started".to_string());
        };
        match child.wait().await {
            Ok(status) => ExitOutcome::from_status(status),
            Err(e) => ExitOutcome::Lost(format!("wait failed: {}", e)),
        }
    }

    async fn close(&self) {
        let mut guard = self.child.lock().await;
        let Some(child) = guard.as_mut() else { return };
        if matches!(child.try_wait(), Ok(Some(_))) {
            return;
        }
        self.signal(Signal::SIGKILL);
        if let Err(e) = child.kill().await {
            tracing::debug!(program = %self.program, error = %e, "kill failed");
        }
    }
}

impl Drop for ProcessChannel {
    fn drop(&mut self) {
        let running = match self.child.get_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        };
        if running {
            self.signal(Signal::SIGKILL);
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
