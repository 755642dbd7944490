// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`, so
//! `main()` stays the only place the process ends (and log guards flush).

use std::fmt;

/// Command finished but some host failed
pub const EXIT_FAILED: i32 = 1;
/// Wait deadline passed with the command still running
pub const EXIT_STILL_RUNNING: i32 = 2;
/// Bad input, bad config, or unknown hosts
pub const EXIT_USAGE: i32 = 3;
/// Command ended cancelled
pub const EXIT_CANCELLED: i32 = 4;
/// Interrupted by Ctrl-C
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit with `code` without printing anything further.
    pub fn silent(code: i32) -> Self {
        Self::new(code, String::new())
    }

    pub fn usage(message: impl fmt::Display) -> Self {
        Self::new(EXIT_USAGE, message.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
