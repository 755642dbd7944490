// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq run` - Run one command across hosts

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::client::DaemonClient;
use crate::color::Painter;
use crate::config::Config;
use crate::exit_error::{ExitError, EXIT_INTERRUPTED};
use crate::inventory;
use crate::output::{
    write_json, write_snapshot, write_started, write_summary, FollowPrinter, OutputFormat,
};
use crate::session::{RunOutcome, RunSession};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run on every host in this group
    #[arg(short, long)]
    pub group: Option<String>,

    /// Run on specific hosts (repeatable)
    #[arg(short = 'H', long = "host", value_name = "GROUP:NAME")]
    pub hosts: Vec<String>,

    /// Stream output until the command finishes (no deadline)
    #[arg(short, long, conflicts_with = "background")]
    pub follow: bool,

    /// Start the command and return its id without waiting
    #[arg(short, long)]
    pub background: bool,

    /// How long to wait before leaving the command running (e.g. 30s, 2m, 1h30m)
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Command line to run on each host
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub async fn run(args: RunArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let targets = inventory::resolve(&config.hosts, args.group.as_deref(), &args.hosts)
        .map_err(ExitError::usage)?;
    let command = args.command.join(" ");
    if command.trim().is_empty() {
        return Err(ExitError::usage("command must not be empty").into());
    }

    let client = DaemonClient::connect_or_start(config).await.map_err(|e| e.into_exit())?;
    if args.background {
        let summary = client.run(&command, targets).await.map_err(|e| e.into_exit())?;
        let mut out = std::io::stdout().lock();
        match format {
            OutputFormat::Json => write_json(&mut out, &summary)?,
            OutputFormat::Text => write_started(&mut out, &summary, Painter::detect())?,
        }
        return Ok(());
    }

    let mut options = config.wait_options();
    if let Some(timeout) = args.timeout {
        options.timeout = timeout;
    }

    let interrupt = CancellationToken::new();
    let listener = tokio::spawn(listen_for_interrupt(interrupt.clone()));
    let session = RunSession::new(&client, options, interrupt);
    let painter = Painter::detect();

    let outcome = if args.follow && format == OutputFormat::Text {
        let mut printer = FollowPrinter::new(painter);
        let mut write_error = None;
        let outcome = session
            .follow(&command, targets, |snapshot| {
                if write_error.is_none() {
                    write_error = printer.update(&mut std::io::stdout().lock(), snapshot).err();
                }
            })
            .await
            .map_err(|e| e.into_exit())?;
        if let Some(e) = write_error {
            return Err(e.into());
        }
        outcome
    } else if args.follow {
        session.follow(&command, targets, |_| {}).await.map_err(|e| e.into_exit())?
    } else {
        session.run(&command, targets).await.map_err(|e| e.into_exit())?
    };
    listener.abort();

    report(&outcome, format, painter, args.follow, options.timeout)?;
    match outcome.exit_code() {
        0 => Ok(()),
        code => Err(ExitError::silent(code).into()),
    }
}

fn report(
    outcome: &RunOutcome,
    format: OutputFormat,
    painter: Painter,
    followed: bool,
    timeout: Duration,
) -> Result<()> {
    let snapshot = outcome.snapshot();
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => write_json(&mut out, snapshot)?,
        OutputFormat::Text if followed => {
            for (id, result) in snapshot.ordered_results() {
                if let Some(error) = &result.error {
                    writeln!(out, "{}", painter.error(&format!("{} | error: {}", id, error)))?;
                }
            }
            write_summary(&mut out, snapshot, painter)?;
        }
        OutputFormat::Text => write_snapshot(&mut out, snapshot, painter)?,
    }
    out.flush()?;

    match outcome {
        RunOutcome::StillRunning(s) => eprintln!(
            "command {} still running after {}s; check it with `sshq status {}`",
            s.id,
            timeout.as_secs_f64(),
            s.id
        ),
        RunOutcome::Interrupted(s) => eprintln!("interrupted; command {} {}", s.id, s.status),
        RunOutcome::Finished(_) => {}
    }
    Ok(())
}

/// First Ctrl-C cancels this run's command; a second one exits immediately
/// and leaves it to the daemon.
async fn listen_for_interrupt(interrupt: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    tracing::warn!("interrupt received, cancelling");
    eprintln!("interrupted, cancelling hosts (Ctrl-C again to exit now)");
    interrupt.cancel();
    if tokio::signal::ctrl_c().await.is_ok() {
        std::process::exit(EXIT_INTERRUPTED);
    }
}

/// Parse a duration like "30s", "2m", "1h30m", or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let mut total_secs: u64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else {
            let n: u64 =
                current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
            current_num.clear();
            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => anyhow::bail!("unknown duration unit '{}' in: {}", c, s),
            };
            total_secs = n
                .checked_mul(unit)
                .and_then(|secs| total_secs.checked_add(secs))
                .ok_or_else(|| anyhow::anyhow!("duration too large: {}", s))?;
        }
    }
    // Bare number → seconds
    if !current_num.is_empty() {
        let n: u64 = current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        total_secs = total_secs
            .checked_add(n)
            .ok_or_else(|| anyhow::anyhow!("duration too large: {}", s))?;
    }
    if total_secs == 0 {
        anyhow::bail!("duration must be > 0: {}", s);
    }
    Ok(Duration::from_secs(total_secs))
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
