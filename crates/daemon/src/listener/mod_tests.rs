// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sshq_adapters::{FakeConnector, FakeHost};
use sshq_core::test_support::targets;
use sshq_core::{CommandSnapshot, CommandStatus};
use sshq_engine::{FakeRunner, RunnerCall};
use sshq_wire::{RejectKind, WaitState};

fn ctx(connector: FakeConnector) -> ListenCtx<FakeRunner> {
    ListenCtx::new(Arc::new(FakeRunner::new(connector)), Arc::new(Notify::new()))
}

async fn send(ctx: &ListenCtx<FakeRunner>, request: Request) -> Response {
    handle_request(request, ctx, CancellationToken::new()).await
}

async fn start(ctx: &ListenCtx<FakeRunner>, hosts: &[&str]) -> String {
    let request = Request::Run { command: "uptime".into(), targets: targets("prod", hosts) };
    match send(ctx, request).await {
        Response::Started { summary } => summary.id.to_string(),
        other => panic!("expected Started, got {other:?}"),
    }
}

async fn settle(ctx: &ListenCtx<FakeRunner>, id: &str) -> CommandSnapshot {
    let request = Request::Wait { id: id.into(), timeout_ms: 10_000, poll_interval_ms: 5 };
    match send(ctx, request).await {
        Response::Waited { state: WaitState::Finished, snapshot } => *snapshot,
        other => panic!("expected a finished wait, got {other:?}"),
    }
}

fn rejected(response: Response) -> (RejectKind, String) {
    match response {
        Response::Error { kind, message } => (kind, message),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn ping_and_hello() {
    let ctx = ctx(FakeConnector::new());
    assert_eq!(send(&ctx, Request::Ping).await, Response::Pong);
    let hello = send(&ctx, Request::Hello { version: "0.0.0".into() }).await;
    assert_eq!(hello, Response::Hello { version: wire::PROTOCOL_VERSION.to_string() });
}

#[tokio::test]
async fn run_then_wait_reports_completion() {
    let ctx = ctx(FakeConnector::new().host("web1", FakeHost::ok("up 3 days\n")));
    let id = start(&ctx, &["web1"]).await;

    let snapshot = settle(&ctx, &id).await;

    assert_eq!(snapshot.status, CommandStatus::Completed);
    assert_eq!(snapshot.results["web1"].output, "up 3 days\n");
}

#[tokio::test]
async fn wait_deadline_leaves_command_running() {
    let ctx = ctx(FakeConnector::new().host("web1", FakeHost::ok("tick\n").hang()));
    let id = start(&ctx, &["web1"]).await;

    let request = Request::Wait { id: id.clone(), timeout_ms: 50, poll_interval_ms: 10 };
    match send(&ctx, request).await {
        Response::Waited { state, snapshot } => {
            assert_eq!(state, WaitState::StillRunning);
            assert_eq!(snapshot.status, CommandStatus::Running);
        }
        other => panic!("expected Waited, got {other:?}"),
    }

    // Still reachable afterwards, and still cancellable.
    let Response::Command { snapshot } = send(&ctx, Request::Get { id: Some(id.clone()) }).await
    else {
        panic!("expected Command");
    };
    assert_eq!(snapshot.status, CommandStatus::Running);
    assert_eq!(send(&ctx, Request::Cancel { id: id.clone() }).await, Response::Ok);
    assert_eq!(settle(&ctx, &id).await.status, CommandStatus::Cancelled);
}

#[tokio::test]
async fn get_without_id_returns_most_recent() {
    let ctx = ctx(
        FakeConnector::new().host("web1", FakeHost::ok("a")).host("web2", FakeHost::ok("b")),
    );
    let _first = start(&ctx, &["web1"]).await;
    ctx.runner.clock().advance(Duration::from_secs(1));
    let second = start(&ctx, &["web2"]).await;

    let Response::Command { snapshot } = send(&ctx, Request::Get { id: None }).await else {
        panic!("expected Command");
    };
    assert_eq!(snapshot.id.as_str(), second);
    assert!(ctx.runner.calls().contains(&RunnerCall::MostRecent));
}

#[tokio::test]
async fn empty_registry_rejects_most_recent() {
    let ctx = ctx(FakeConnector::new());
    let (kind, message) = rejected(send(&ctx, Request::Get { id: None }).await);
    assert_eq!(kind, RejectKind::Invalid);
    assert_eq!(message, "no commands found");
}

#[tokio::test]
async fn unknown_id_is_invalid() {
    let ctx = ctx(FakeConnector::new());
    let (kind, message) = rejected(send(&ctx, Request::Cancel { id: "cmd-nope".into() }).await);
    assert_eq!(kind, RejectKind::Invalid);
    assert_eq!(message, "command not found: cmd-nope");
}

#[tokio::test]
async fn cancelling_a_finished_command_conflicts() {
    let ctx = ctx(FakeConnector::new().host("web1", FakeHost::ok("done")));
    let id = start(&ctx, &["web1"]).await;
    settle(&ctx, &id).await;

    let (kind, message) = rejected(send(&ctx, Request::Cancel { id }).await);
    assert_eq!(kind, RejectKind::Conflict);
    assert_eq!(message, "command is not running (status: completed)");
}

#[tokio::test]
async fn list_filters_by_status() {
    let ctx = ctx(
        FakeConnector::new()
            .host("web1", FakeHost::ok("done"))
            .host("web2", FakeHost::default().hang()),
    );
    let done = start(&ctx, &["web1"]).await;
    settle(&ctx, &done).await;
    let busy = start(&ctx, &["web2"]).await;

    let Response::Commands { commands } =
        send(&ctx, Request::List { status: Some("running".into()) }).await
    else {
        panic!("expected Commands");
    };
    let ids: Vec<_> = commands.iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, vec![busy.clone()]);

    drain(ctx.runner.as_ref(), Duration::from_secs(5), Duration::from_millis(5)).await;
}

#[tokio::test]
async fn bad_status_filter_is_invalid() {
    let ctx = ctx(FakeConnector::new());
    let (kind, message) =
        rejected(send(&ctx, Request::List { status: Some("Running".into()) }).await);
    assert_eq!(kind, RejectKind::Invalid);
    assert!(message.starts_with("invalid status filter"), "{message}");
}

#[tokio::test]
async fn run_rejects_empty_command_and_targets() {
    let ctx = ctx(FakeConnector::new());
    let blank = Request::Run { command: "  ".into(), targets: targets("prod", &["web1"]) };
    assert_eq!(rejected(send(&ctx, blank).await).0, RejectKind::Invalid);
    let nowhere = Request::Run { command: "uptime".into(), targets: Vec::new() };
    assert_eq!(rejected(send(&ctx, nowhere).await).1, "no target hosts");
    assert!(ctx.runner.calls().is_empty());
}

#[tokio::test]
async fn status_counts_running_commands() {
    let ctx = ctx(FakeConnector::new().host("web1", FakeHost::default().hang()));
    start(&ctx, &["web1"]).await;

    match send(&ctx, Request::Status).await {
        Response::Status { commands, running, .. } => {
            assert_eq!(commands, 1);
            assert_eq!(running, 1);
        }
        other => panic!("expected Status, got {other:?}"),
    }
    assert!(!ctx.is_idle(Duration::ZERO));

    assert_eq!(drain(ctx.runner.as_ref(), Duration::from_secs(5), Duration::from_millis(5)).await, 0);
    assert!(ctx.is_idle(Duration::ZERO));
}

#[tokio::test]
async fn shutdown_notifies_the_main_loop() {
    let ctx = ctx(FakeConnector::new());
    let notified = ctx.shutdown.notified();
    tokio::pin!(notified);
    notified.as_mut().enable();

    assert_eq!(send(&ctx, Request::Shutdown).await, Response::ShuttingDown);
    tokio::time::timeout(Duration::from_secs(1), notified).await.unwrap();
}

#[tokio::test]
async fn connection_round_trip_over_a_pipe() {
    let ctx = ctx(FakeConnector::new());
    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let (mut client_read, mut client_write) = tokio::io::split(client);

    let serve = handle_connection(server_read, server_write, &ctx);
    let ask = async {
        wire::write_request(&mut client_write, &Request::Ping, Duration::from_secs(1)).await?;
        wire::read_response(&mut client_read, Duration::from_secs(1)).await
    };
    let (served, answer) = tokio::join!(serve, ask);

    served.unwrap();
    assert_eq!(answer.unwrap(), Response::Pong);
}

#[tokio::test]
async fn client_hangup_stops_the_wait_but_not_the_command() {
    let ctx = ctx(FakeConnector::new().host("web1", FakeHost::default().hang()));
    let id = start(&ctx, &["web1"]).await;
    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let (_client_read, mut client_write) = tokio::io::split(client);

    let wait = Request::Wait { id: id.clone(), timeout_ms: 60_000, poll_interval_ms: 10 };
    wire::write_request(&mut client_write, &wait, Duration::from_secs(1)).await.unwrap();
    // A byte after the request reads as a hangup.
    tokio::io::AsyncWriteExt::write_all(&mut client_write, b"x").await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), handle_connection(server_read, server_write, &ctx))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ctx.runner.get(&id).unwrap().status(), CommandStatus::Running);

    drain(ctx.runner.as_ref(), Duration::from_secs(5), Duration::from_millis(5)).await;
}
