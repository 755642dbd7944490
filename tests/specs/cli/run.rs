// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq run` specs against local hosts

use crate::prelude::*;

#[test]
fn group_run_prints_each_host() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-g", "dev", "echo", "hello"])
        .passes()
        .stdout_has("== dev:a ==\nhello\n")
        .stdout_has("== dev:b ==\nhello\n")
        .stdout_has("completed (2 hosts, 2 reported, 0 failed)")
        .stdout_lacks("ops:c");
}

#[test]
fn explicit_hosts_run_in_request_order() {
    let inv = Inventory::local();
    let out = inv.sshq().args(&["run", "-H", "ops:c", "-H", "dev:a", "echo", "hi"]).passes();
    let c = out.stdout.find("== ops:c ==").unwrap();
    let a = out.stdout.find("== dev:a ==").unwrap();
    assert!(c < a, "{}", out.stdout);
}

#[test]
fn failing_command_exits_one() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-H", "dev:a", "false"])
        .exits(1)
        .stdout_has("error: command failed: exit status 1")
        .stdout_has("failed (1 hosts, 1 reported, 1 failed)");
}

#[test]
fn stderr_is_captured_with_stdout() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "dev:a", "echo", "oops", "1>&2"]).passes().stdout_has("oops");
}

#[test]
fn json_output_is_a_snapshot() {
    let inv = Inventory::local();
    let json = inv.sshq().args(&["-o", "json", "run", "-g", "dev", "echo", "hi"]).passes().json();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["command"], "echo hi");
    assert_eq!(json["results"]["a"]["output"], "hi\n");
    assert_eq!(json["results"]["b"]["output"], "hi\n");
    assert!(json["id"].as_str().unwrap().starts_with("cmd-"));
    assert!(json["ended_at_ms"].is_u64());
}

#[test]
fn deadline_leaves_command_running() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-H", "dev:a", "--timeout", "1", "echo", "started;", "sleep", "20"])
        .exits(2)
        .stdout_has("started")
        .stdout_has("running")
        .stderr_has("still running");
}

#[test]
fn command_outlives_the_run_that_started_it() {
    let inv = Inventory::local();
    let json = inv
        .sshq()
        .args(&["-o", "json", "run", "-H", "dev:a", "--timeout", "1", "echo", "started;", "sleep", "20"])
        .exits(2)
        .json();
    let id = json["id"].as_str().unwrap().to_string();

    inv.sshq().args(&["status", &id]).exits(2).stdout_has("started").stdout_has("running");
    inv.sshq().args(&["cancel", &id]).passes();
    let cancelled = wait_for(5_000, || inv.sshq().args(&["status", &id]).output().code == Some(4));
    assert!(cancelled, "command should end cancelled");
}

#[test]
fn timeout_env_override_applies() {
    let inv = Inventory::local();
    let json = inv
        .sshq()
        .env("SSHQ_WAIT_TIMEOUT_MS", "500")
        .args(&["-o", "json", "run", "-H", "dev:a", "sleep", "20"])
        .exits(2)
        .json();
    assert_eq!(json["status"], "running");
}

#[test]
fn follow_streams_prefixed_lines() {
    let inv = Inventory::local();
    inv.sshq()
        .env("SSHQ_POLL_INTERVAL_MS", "50")
        .args(&["run", "-g", "dev", "--follow", "echo", "one;", "sleep", "1;", "echo", "two"])
        .passes()
        .stdout_has("dev:a | one\n")
        .stdout_has("dev:a | two\n")
        .stdout_has("dev:b | two\n")
        .stdout_has("completed");
}

#[test]
fn unknown_host_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-H", "dev:zzz", "true"])
        .exits(3)
        .stderr_has("no matching hosts for: dev:zzz");
}

#[test]
fn unknown_hosts_are_skipped_when_some_match() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-H", "dev:a", "-H", "dev:zzz", "echo", "ok"])
        .passes()
        .stdout_has("== dev:a ==")
        .stdout_lacks("dev:zzz");
}

#[test]
fn selectors_are_exclusive() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "-g", "dev", "-H", "dev:a", "true"])
        .exits(3)
        .stderr_has("cannot specify both --group and --host");
    inv.sshq().args(&["run", "true"]).exits(3).stderr_has("must specify either --group or --host");
}

#[test]
fn empty_group_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-g", "qa", "true"]).exits(3).stderr_has("no hosts found in group: qa");
}

#[test]
fn malformed_host_id_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "nocolon", "true"]).exits(3).stderr_has("group:name");
}

#[test]
fn bad_timeout_is_rejected_by_the_parser() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-g", "dev", "--timeout", "5d", "true"]).exits(2);
}

#[test]
fn unreachable_ssh_host_reports_connect_error() {
    let inv = Inventory::new(
        r#"
connect_timeout = 1000

[[hosts]]
group = "prod"
name = "web1"
connection = "ssh://deploy@127.0.0.1:1"
"#,
    );
    inv.sshq()
        .args(&["run", "-g", "prod", "uptime"])
        .exits(1)
        .stdout_has("error: failed to connect: ");
}
