// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `run --background`, `status`, `list`, `cancel`, and `daemon` specs

use crate::prelude::*;

fn start_background(inv: &Inventory, args: &[&str]) -> String {
    let mut full = vec!["-o", "json", "run", "--background"];
    full.extend_from_slice(args);
    let json = inv.sshq().args(&full).passes().json();
    assert_eq!(json["status"], "running");
    json["id"].as_str().unwrap().to_string()
}

#[test]
fn background_run_returns_immediately() {
    let inv = Inventory::local();
    inv.sshq()
        .args(&["run", "--background", "-g", "dev", "sleep", "20"])
        .passes()
        .stdout_has("running in background (2 hosts)");
    inv.sshq().args(&["list"]).passes().stdout_has("running").stdout_has("sleep 20");
}

#[test]
fn background_result_is_kept() {
    let inv = Inventory::local();
    let id = start_background(&inv, &["-H", "dev:a", "echo", "hi"]);
    let done = wait_for(5_000, || inv.sshq().args(&["status", &id]).output().code == Some(0));
    assert!(done, "command should complete");
    inv.sshq()
        .args(&["status", &id])
        .passes()
        .stdout_has("== dev:a ==\nhi\n")
        .stdout_has("completed (1 hosts, 1 reported, 0 failed)");
}

#[test]
fn status_defaults_to_most_recent() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "dev:a", "echo", "first"]).passes();
    inv.sshq().args(&["run", "-H", "dev:b", "echo", "second"]).passes();
    inv.sshq().args(&["status"]).passes().stdout_has("second").stdout_lacks("first");
}

#[test]
fn status_reports_failed_commands() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "dev:a", "false"]).exits(1);
    inv.sshq().args(&["status"]).exits(1).stdout_has("failed");
}

#[test]
fn status_without_commands_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq().args(&["status"]).exits(3).stderr_has("no commands found");
    inv.sshq().args(&["status", "cmd-nope"]).exits(3).stderr_has("command not found: cmd-nope");
}

#[test]
fn list_filters_by_status() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "dev:a", "echo", "quick"]).passes();
    start_background(&inv, &["-H", "dev:b", "sleep", "20"]);

    let running = inv.sshq().args(&["-o", "json", "list", "--status", "running"]).passes().json();
    let running = running.as_array().unwrap();
    assert_eq!(running.len(), 1);
    assert_eq!(running[0]["command"], "sleep 20");

    inv.sshq()
        .args(&["list", "--status", "completed"])
        .passes()
        .stdout_has("echo quick")
        .stdout_lacks("sleep 20");
}

#[test]
fn list_is_newest_first() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "-H", "dev:a", "echo", "older"]).passes();
    inv.sshq().args(&["run", "-H", "dev:a", "echo", "newer"]).passes();
    let out = inv.sshq().args(&["list"]).passes();
    let newer = out.stdout.find("echo newer").unwrap();
    let older = out.stdout.find("echo older").unwrap();
    assert!(newer < older, "{}", out.stdout);
}

#[test]
fn empty_list_says_so() {
    let inv = Inventory::local();
    inv.sshq().args(&["list"]).passes().stdout_has("No commands");
}

#[test]
fn bad_status_filter_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq().args(&["list", "--status", "bogus"]).exits(3).stderr_has("invalid status filter");
    inv.sshq().args(&["run", "-H", "dev:a", "true"]).passes();
    inv.sshq().args(&["list", "--status", "bogus"]).exits(3).stderr_has("invalid status filter");
}

#[test]
fn cancel_stops_a_background_command() {
    let inv = Inventory::local();
    let id = start_background(&inv, &["-g", "dev", "sleep", "20"]);
    inv.sshq().args(&["cancel", &id]).passes().stdout_has(&format!("cancelling {}", id));
    let cancelled = wait_for(5_000, || inv.sshq().args(&["status", &id]).output().code == Some(4));
    assert!(cancelled, "command should end cancelled");
    inv.sshq().args(&["list", "--status", "cancelled"]).passes().stdout_has(&id);
}

#[test]
fn cancel_unknown_id_is_a_usage_error() {
    let inv = Inventory::local();
    inv.sshq().args(&["cancel", "cmd-nope"]).exits(3).stderr_has("command not found: cmd-nope");
}

#[test]
fn cancel_after_completion_fails() {
    let inv = Inventory::local();
    let json = inv.sshq().args(&["-o", "json", "run", "-H", "dev:a", "true"]).passes().json();
    let id = json["id"].as_str().unwrap().to_string();
    inv.sshq().args(&["cancel", &id]).exits(1).stderr_has("command is not running");
}

#[test]
fn background_conflicts_with_follow() {
    let inv = Inventory::local();
    inv.sshq().args(&["run", "--background", "--follow", "-g", "dev", "true"]).exits(2);
}

#[test]
fn daemon_stop_and_status() {
    let inv = Inventory::local();
    inv.sshq().args(&["daemon", "status"]).passes().stdout_has("Daemon not running");
    inv.sshq().args(&["daemon", "stop"]).passes().stdout_has("Daemon not running");

    inv.sshq().args(&["run", "-H", "dev:a", "true"]).passes();
    inv.sshq()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running")
        .stdout_has("Commands: 1 (0 running)");
    inv.sshq().args(&["daemon", "stop"]).passes().stdout_has("Daemon stopped");
    inv.sshq().args(&["daemon", "status"]).passes().stdout_has("Daemon not running");
}

#[test]
fn stopping_the_daemon_drops_its_commands() {
    let inv = Inventory::local();
    start_background(&inv, &["-H", "dev:a", "sleep", "20"]);
    inv.sshq().args(&["daemon", "stop"]).passes().stdout_has("Daemon stopped");
    inv.sshq().args(&["status"]).exits(3).stderr_has("no commands found");
}
