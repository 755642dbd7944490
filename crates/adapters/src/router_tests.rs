// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{FakeCall, FakeConnector, FakeHost};
use sshq_core::HostId;

fn router() -> (TransportRouter, FakeConnector, FakeConnector) {
    let ssh = FakeConnector::new().host("remote", FakeHost::ok(""));
    let local = FakeConnector::new().host("here", FakeHost::ok(""));
    let router = TransportRouter::from_parts(Arc::new(ssh.clone()), Arc::new(local.clone()));
    (router, ssh, local)
}

#[tokio::test]
async fn ssh_targets_go_to_ssh_connector() {
    let (router, ssh, local) = router();
    let target = HostTarget::builder().id(HostId::new("prod", "remote")).build();
    router.open(&target).await.unwrap();
    assert_eq!(ssh.calls(), vec![FakeCall::Open("remote".to_string())]);
    assert!(local.calls().is_empty());
}

#[tokio::test]
async fn local_targets_go_to_local_connector() {
    let (router, ssh, local) = router();
    router.open(&HostTarget::local("dev", "here")).await.unwrap();
    assert_eq!(local.calls(), vec![FakeCall::Open("here".to_string())]);
    assert!(ssh.calls().is_empty());
}

#[tokio::test]
async fn default_router_runs_local_commands() {
    use tokio::io::AsyncReadExt;

    let router = TransportRouter::default();
    let conn = router.open(&HostTarget::local("dev", "here")).await.unwrap();
    let mut channel = conn.new_channel().await.unwrap();
    channel.start("printf hi").await.unwrap();
    let mut out = String::new();
    channel.take_stdout().unwrap().read_to_string(&mut out).await.unwrap();
    assert_eq!(out, "hi");
    assert!(channel.wait().await.is_success());
    channel.close().await;
    conn.close().await;
}
