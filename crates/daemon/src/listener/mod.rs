// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each connection carries one request and one response. Handlers run
//! against the shared command registry.

mod commands;

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sshq_engine::Runner;
use sshq_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::env::ipc_timeout;

pub use commands::drain;

/// Shared daemon context for all request handlers.
pub struct ListenCtx<R: Runner> {
    pub runner: Arc<R>,
    pub shutdown: Arc<Notify>,
    pub start_time: Instant,
    last_request: Mutex<Instant>,
}

impl<R: Runner> ListenCtx<R> {
    pub fn new(runner: Arc<R>, shutdown: Arc<Notify>) -> Self {
        let now = Instant::now();
        Self { runner, shutdown, start_time: now, last_request: Mutex::new(now) }
    }

    /// No request for `idle` and nothing pending or running.
    pub fn is_idle(&self, idle: Duration) -> bool {
        self.last_request.lock().elapsed() >= idle && commands::active(self.runner.as_ref()) == 0
    }

    fn touch(&self) {
        *self.last_request.lock() = Instant::now();
    }
}

/// Listener task for accepting socket connections.
pub struct Listener<R: Runner> {
    unix: UnixListener,
    ctx: Arc<ListenCtx<R>>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl<R: Runner> Listener<R> {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx<R>>) -> Self {
        Self { unix, ctx }
    }

    /// Accept until the task is dropped, one spawned task per connection.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("unix accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => debug!("client disconnected"),
        ConnectionError::Protocol(ProtocolError::Timeout) => warn!("connection timeout"),
        _ => error!("connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// The handler races client disconnect: a `Wait` whose client has gone away
/// stops waiting, while the command itself keeps running.
pub async fn handle_connection<R, W, Rn>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx<Rn>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    Rn: Runner,
{
    let request = wire::read_request(&mut reader, ipc_timeout()).await?;
    ctx.touch();

    // Waits and reads are frequent; everything else is an action.
    if matches!(request, Request::Wait { .. } | Request::Get { .. } | Request::List { .. }) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let token = CancellationToken::new();
    let response = tokio::select! {
        response = handle_request(request, ctx, token.clone()) => response,
        _ = detect_client_disconnect(&mut reader) => {
            token.cancel();
            debug!("client disconnected, cancelling handler");
            return Ok(());
        }
    };
    ctx.touch();

    debug!("sending response: {:?}", response);
    wire::write_response(&mut writer, &response, ipc_timeout()).await?;
    Ok(())
}

/// The client sends one request then waits, so any read completing means
/// it hung up.
async fn detect_client_disconnect<R: AsyncRead + Unpin>(reader: &mut R) {
    let mut buf = [0u8; 1];
    let _ = reader.read(&mut buf).await;
}

/// Handle a single request and return a response.
///
/// `cancel` fires when the client disconnects.
pub async fn handle_request<R: Runner>(
    request: Request,
    ctx: &ListenCtx<R>,
    cancel: CancellationToken,
) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version } => {
            if version != wire::PROTOCOL_VERSION {
                warn!(client = %version, daemon = wire::PROTOCOL_VERSION, "protocol version mismatch");
            }
            Response::Hello { version: wire::PROTOCOL_VERSION.to_string() }
        }

        Request::Run { command, targets } => commands::handle_run(ctx, &command, targets),

        Request::Wait { id, timeout_ms, poll_interval_ms } => {
            commands::handle_wait(ctx, &id, timeout_ms, poll_interval_ms, &cancel).await
        }

        Request::Get { id } => commands::handle_get(ctx, id.as_deref()),

        Request::List { status } => commands::handle_list(ctx, status.as_deref()),

        Request::Cancel { id } => commands::handle_cancel(ctx, &id),

        Request::Status => commands::handle_status(ctx),

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
