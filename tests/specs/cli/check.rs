// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq check` specs

use crate::prelude::*;

#[test]
fn valid_config_passes() {
    Inventory::local().sshq().args(&["check"]).passes().stdout_has("config ok").stdout_has("3 hosts in 2 groups");
}

#[test]
fn missing_default_config_uses_defaults() {
    let home = tempfile::tempdir().unwrap();
    cli()
        .env("HOME", &home.path().display().to_string())
        .env("XDG_CONFIG_HOME", &home.path().join("xdg").display().to_string())
        .args(&["check"])
        .passes()
        .stdout_has("(defaults)")
        .stdout_has("0 hosts in 0 groups");
}

#[test]
fn explicit_missing_config_exits_three() {
    cli().args(&["--config", "/nonexistent/sshq.toml", "check"]).exits(3).stderr_has("invalid config");
}

#[test]
fn unparseable_config_exits_three() {
    Inventory::new("hosts = [").sshq().args(&["check"]).exits(3).stderr_has("invalid config");
}

#[test]
fn duplicate_host_exits_three() {
    Inventory::new(
        r#"
[[hosts]]
group = "dev"
name = "a"
transport = "local"

[[hosts]]
group = "dev"
name = "a"
transport = "local"
"#,
    )
    .sshq()
    .args(&["check"])
    .exits(3)
    .stderr_has("duplicate host dev:a");
}

#[test]
fn bad_connection_string_exits_three() {
    Inventory::new(
        r#"
[[hosts]]
group = "prod"
name = "web1"
connection = "http://example.com"
"#,
    )
    .sshq()
    .args(&["check"])
    .exits(3)
    .stderr_has("invalid SSH connection string");
}

#[test]
fn json_reports_counts() {
    let json = Inventory::local().sshq().args(&["-o", "json", "check"]).passes().json();
    assert_eq!(json["hosts"], 3);
    assert_eq!(json["groups"], serde_json::json!(["dev", "ops"]));
}
