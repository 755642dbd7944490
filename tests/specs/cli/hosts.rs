// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq hosts` specs

use crate::prelude::*;

#[test]
fn lists_all_hosts() {
    Inventory::local()
        .sshq()
        .args(&["hosts"])
        .passes()
        .stdout_has("dev:a")
        .stdout_has("dev:b")
        .stdout_has("ops:c")
        .stdout_has("local");
}

#[test]
fn group_filter() {
    Inventory::local().sshq().args(&["hosts", "-g", "ops"]).passes().stdout_has("ops:c").stdout_lacks("dev:");
}

#[test]
fn unknown_group_exits_three() {
    Inventory::local().sshq().args(&["hosts", "--group", "qa"]).exits(3);
}

#[test]
fn json_lists_targets() {
    let json = Inventory::local().sshq().args(&["hosts", "-o", "json"]).passes().json();
    let hosts = json.as_array().unwrap();
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[0]["id"]["group"], "dev");
    assert_eq!(hosts[0]["transport"], "local");
}

#[test]
fn ssh_hosts_show_address_and_port() {
    Inventory::new(
        r#"
[[hosts]]
group = "prod"
name = "web1"
connection = "deploy@10.0.0.5:2222"
"#,
    )
    .sshq()
    .args(&["hosts"])
    .passes()
    .stdout_has("prod:web1  10.0.0.5:2222  ssh");
}
