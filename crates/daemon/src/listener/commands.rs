// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command registry handlers.

use std::time::Duration;

use sshq_core::{CommandStatus, HostTarget};
use sshq_engine::{wait_or_snapshot, EngineError, Runner, WaitOptions, WaitOutcome};
use sshq_wire::{RejectKind, Response, WaitState};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::ListenCtx;

/// Floor for client-supplied poll intervals.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub(super) fn handle_run<R: Runner>(
    ctx: &ListenCtx<R>,
    command: &str,
    targets: Vec<HostTarget>,
) -> Response {
    if command.trim().is_empty() {
        return Response::error(RejectKind::Invalid, "command must not be empty");
    }
    if targets.is_empty() {
        return Response::error(RejectKind::Invalid, "no target hosts");
    }
    let cmd = ctx.runner.create(command, targets);
    if let Err(e) = cmd.start() {
        return reject(e);
    }
    info!(command_id = %cmd.id(), hosts = cmd.targets().len(), "command started");
    Response::Started { summary: cmd.summary() }
}

pub(super) async fn handle_wait<R: Runner>(
    ctx: &ListenCtx<R>,
    id: &str,
    timeout_ms: u64,
    poll_interval_ms: u64,
    cancel: &CancellationToken,
) -> Response {
    let cmd = match ctx.runner.get(id) {
        Ok(cmd) => cmd,
        Err(e) => return reject(e),
    };
    let options = WaitOptions {
        timeout: Duration::from_millis(timeout_ms),
        poll_interval: Duration::from_millis(poll_interval_ms).max(MIN_POLL_INTERVAL),
    };
    match wait_or_snapshot(&cmd, options, cancel).await {
        WaitOutcome::Finished(s) => {
            Response::Waited { state: WaitState::Finished, snapshot: Box::new(s) }
        }
        WaitOutcome::StillRunning(s) => {
            Response::Waited { state: WaitState::StillRunning, snapshot: Box::new(s) }
        }
        WaitOutcome::Aborted(id) => {
            Response::error(RejectKind::Internal, format!("wait for {} aborted", id))
        }
    }
}

pub(super) fn handle_get<R: Runner>(ctx: &ListenCtx<R>, id: Option<&str>) -> Response {
    let found = match id {
        Some(id) => ctx.runner.get(id),
        None => ctx.runner.most_recent(),
    };
    match found {
        Ok(cmd) => Response::Command { snapshot: Box::new(cmd.snapshot()) },
        Err(e) => reject(e),
    }
}

pub(super) fn handle_list<R: Runner>(ctx: &ListenCtx<R>, status: Option<&str>) -> Response {
    match ctx.runner.list(status) {
        Ok(commands) => Response::Commands { commands },
        Err(e) => reject(e),
    }
}

pub(super) fn handle_cancel<R: Runner>(ctx: &ListenCtx<R>, id: &str) -> Response {
    match ctx.runner.get(id).and_then(|cmd| cmd.cancel()) {
        Ok(()) => {
            info!(command_id = id, "cancel requested");
            Response::Ok
        }
        Err(e) => reject(e),
    }
}

pub(super) fn handle_status<R: Runner>(ctx: &ListenCtx<R>) -> Response {
    let commands = ctx.runner.list(None).unwrap_or_default();
    let running = commands.iter().filter(|c| c.status == CommandStatus::Running).count();
    Response::Status {
        uptime_secs: ctx.start_time.elapsed().as_secs(),
        commands: commands.len(),
        running,
    }
}

/// Commands that have not reached a terminal status.
pub(super) fn active<R: Runner>(runner: &R) -> usize {
    runner.list(None).map_or(0, |all| all.iter().filter(|c| !c.status.is_terminal()).count())
}

/// Cancel everything, then wait up to `timeout` for hosts to wind down.
///
/// Returns how many commands were still active when the wait ended.
pub async fn drain<R: Runner>(runner: &R, timeout: Duration, poll_interval: Duration) -> usize {
    runner.cancel_all();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let remaining = active(runner);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

fn reject(e: EngineError) -> Response {
    let kind = match e {
        EngineError::NotFound(_) | EngineError::NoCommands | EngineError::InvalidStatus(_) => {
            RejectKind::Invalid
        }
        EngineError::NotPending(_) | EngineError::NotRunning(_) => RejectKind::Conflict,
        EngineError::NoRuntime => RejectKind::Internal,
    };
    Response::error(kind, e.to_string())
}
