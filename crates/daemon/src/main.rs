// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sshqd: keeps commands running between `sshq` invocations

use std::sync::Arc;
use std::time::Duration;

use sshq_adapters::{LocalConnector, SshConnector, TransportRouter};
use sshq_daemon::{drain, env, logging, startup, Config, LifecycleError, ListenCtx, Listener};
use sshq_engine::CommandRunner;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// How often idle and drain checks run.
const CHECK_INTERVAL: Duration = Duration::from_millis(250);

fn main() {
    let result = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime.block_on(run()),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        eprintln!("sshqd: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LifecycleError> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config.log_path)?;

    let started = match startup(&config) {
        Ok(started) => started,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e);
        }
    };

    let router = TransportRouter::new(
        SshConnector::new(env::ssh_program(), env::connect_timeout()),
        LocalConnector::new(),
    );
    let runner = Arc::new(CommandRunner::new(Arc::new(router)));
    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ListenCtx::new(Arc::clone(&runner), Arc::clone(&shutdown)));
    let listener = tokio::spawn(Listener::new(started.listener, Arc::clone(&ctx)).run());
    info!(
        ssh_program = %env::ssh_program(),
        connect_timeout_ms = env::connect_timeout().as_millis() as u64,
        "daemon ready"
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let idle = env::idle_timeout();
    let mut check = tokio::time::interval(CHECK_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("shutdown requested");
                break;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT");
                break;
            }
            _ = check.tick() => {
                if idle.is_some_and(|idle| ctx.is_idle(idle)) {
                    info!("idle, exiting");
                    break;
                }
            }
        }
    }

    // Stop taking requests, then wind down whatever is still running.
    listener.abort();
    let remaining = drain(runner.as_ref(), env::drain_timeout(), CHECK_INTERVAL).await;
    if remaining > 0 {
        warn!(remaining, "commands still active after drain timeout");
    }
    started.daemon.shutdown();
    Ok(())
}
