// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("run").stdout_has("hosts");
}

#[test]
fn run_help_shows_selectors() {
    cli().args(&["run", "--help"]).passes().stdout_has("--group").stdout_has("--timeout");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn no_subcommand_is_a_usage_error() {
    cli().exits(2).stderr_has("Usage:");
}
