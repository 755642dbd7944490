// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub use serde_json::Value;

/// Start a CLI invocation with an isolated environment.
pub fn cli() -> Cli {
    Cli { args: Vec::new(), env: Vec::new() }
}

pub struct Cli {
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Run without asserting the exit code.
    pub fn output(self) -> Output {
        self.try_output().unwrap()
    }

    fn try_output(self) -> Option<Output> {
        let mut cmd = assert_cmd::Command::cargo_bin("sshq").ok()?;
        cmd.env_remove("SSHQ_CONFIG")
            .env_remove("SSHQ_LOG")
            .env_remove("RUST_LOG")
            .env_remove("SSHQ_WAIT_TIMEOUT_MS")
            .env_remove("SSHQ_POLL_INTERVAL_MS")
            .env_remove("SSHQ_CONNECT_TIMEOUT_MS")
            .env_remove("SSHQ_SSH_PROGRAM")
            .env_remove("SSHQ_STATE_DIR")
            .env_remove("XDG_STATE_HOME")
            .env_remove("SSHQ_IPC_TIMEOUT_MS")
            .env_remove("SSHQ_DAEMON_IDLE_MS")
            .env_remove("SSHQ_DAEMON_START_TIMEOUT_MS")
            .env("NO_COLOR", "1")
            .timeout(std::time::Duration::from_secs(30))
            .args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        let out = cmd.output().ok()?;
        Some(Output {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    /// Run and assert exit code 0.
    pub fn passes(self) -> Output {
        let out = self.output();
        assert_eq!(out.code, Some(0), "expected success\n{}", out.describe());
        out
    }

    /// Run and assert the given exit code.
    pub fn exits(self, code: i32) -> Output {
        let out = self.output();
        assert_eq!(out.code, Some(code), "unexpected exit code\n{}", out.describe());
        out
    }
}

pub struct Output {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    fn describe(&self) -> String {
        format!("code: {:?}\nstdout:\n{}\nstderr:\n{}", self.code, self.stdout, self.stderr)
    }

    pub fn stdout_has(&self, needle: &str) -> &Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_lacks(&self, needle: &str) -> &Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}\n{}", self.describe());
        self
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON: {e}\n{}", self.describe()))
    }
}

/// A temporary config file and daemon state directory.
///
/// Dropping it stops the daemon its commands started.
pub struct Inventory {
    dir: TempDir,
}

impl Inventory {
    pub fn new(toml: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), toml).unwrap();
        Self { dir }
    }

    /// Local hosts `dev:a`, `dev:b`, and `ops:c`.
    pub fn local() -> Self {
        Self::new(
            r#"
[[hosts]]
group = "dev"
name = "a"
transport = "local"

[[hosts]]
group = "dev"
name = "b"
transport = "local"

[[hosts]]
group = "ops"
name = "c"
transport = "local"
"#,
        )
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// CLI invocation using this config and its own daemon.
    pub fn sshq(&self) -> Cli {
        let path = self.path();
        cli()
            .env("SSHQ_CONFIG", &path.display().to_string())
            .env("HOME", &self.dir().display().to_string())
            .env("SSHQ_STATE_DIR", &self.state_dir().display().to_string())
            // Outlives a crashed spec by at most this long.
            .env("SSHQ_DAEMON_IDLE_MS", "60000")
    }
}

impl Drop for Inventory {
    fn drop(&mut self) {
        if self.state_dir().join("daemon.sock").exists() {
            let _ = self.sshq().args(&["daemon", "stop"]).try_output();
        }
    }
}

/// Poll `check` every 50ms until it holds or `max_ms` passes.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(max_ms);
    while std::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
    check()
}
