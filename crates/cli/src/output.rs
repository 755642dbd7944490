// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use sshq_core::{CommandSnapshot, CommandSummary, HostTarget};

use crate::color::Painter;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn write_json<T: Serialize + ?Sized>(
    out: &mut (impl Write + ?Sized),
    value: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Per-host blocks followed by a one-line summary.
pub fn write_snapshot(
    out: &mut (impl Write + ?Sized),
    snapshot: &CommandSnapshot,
    painter: Painter,
) -> std::io::Result<()> {
    for (id, result) in snapshot.ordered_results() {
        writeln!(out, "{}", painter.header(&format!("== {} ==", id)))?;
        if !result.output.is_empty() {
            write!(out, "{}", result.output)?;
            if !result.output.ends_with('\n') {
                writeln!(out)?;
            }
        }
        if let Some(error) = &result.error {
            writeln!(out, "{}", painter.error(&format!("error: {}", error)))?;
        }
    }
    write_summary(out, snapshot, painter)
}

pub fn write_summary(
    out: &mut (impl Write + ?Sized),
    snapshot: &CommandSnapshot,
    painter: Painter,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} {}",
        snapshot.id,
        painter.status(snapshot.status),
        painter.context(&format!(
            "({} hosts, {} reported, {} failed)",
            snapshot.hosts.len(),
            snapshot.results.len(),
            snapshot.error_count()
        )),
    )
}

/// Confirmation for `run --background`.
pub fn write_started(
    out: &mut (impl Write + ?Sized),
    summary: &CommandSummary,
    painter: Painter,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} {}",
        summary.id,
        painter.status(summary.status),
        painter.context(&format!("in background ({} hosts)", summary.hosts.len())),
    )
}

/// One line per command: id, status, host count, command text.
pub fn write_commands(
    out: &mut (impl Write + ?Sized),
    commands: &[CommandSummary],
    painter: Painter,
) -> std::io::Result<()> {
    const STATUS_WIDTH: usize = 9;
    for summary in commands {
        let pad = STATUS_WIDTH.saturating_sub(summary.status.to_string().len());
        writeln!(
            out,
            "{}  {}{}  {}  {}",
            summary.id,
            painter.status(summary.status),
            " ".repeat(pad),
            painter.context(&format!("{:>3} hosts", summary.hosts.len())),
            summary.command,
        )?;
    }
    Ok(())
}

pub fn write_hosts(out: &mut (impl Write + ?Sized), hosts: &[HostTarget]) -> std::io::Result<()> {
    let width = hosts.iter().map(|h| h.id.to_string().len()).max().unwrap_or(0);
    for host in hosts {
        writeln!(
            out,
            "{:<width$}  {}:{}  {}",
            host.id.to_string(),
            host.address,
            host.port,
            host.transport,
            width = width
        )?;
    }
    Ok(())
}

/// Prints each host's output as it grows, one prefixed line at a time.
///
/// Incomplete trailing lines are held back until a newline arrives or the
/// command finishes.
pub struct FollowPrinter {
    printed: HashMap<String, usize>,
    painter: Painter,
}

impl FollowPrinter {
    pub fn new(painter: Painter) -> Self {
        Self { printed: HashMap::new(), painter }
    }

    pub fn update(
        &mut self,
        out: &mut (impl Write + ?Sized),
        snapshot: &CommandSnapshot,
    ) -> std::io::Result<()> {
        let finished = snapshot.status.is_terminal();
        for (id, result) in snapshot.ordered_results() {
            let printed = self.printed.entry(id.name.clone()).or_insert(0);
            let Some(fresh) = result.output.get(*printed..) else { continue };
            let end = if finished || result.error.is_some() {
                fresh.len()
            } else {
                fresh.rfind('\n').map_or(0, |i| i + 1)
            };
            let prefix = self.painter.header(&format!("{} |", id));
            for line in fresh[..end].lines() {
                writeln!(out, "{} {}", prefix, line)?;
            }
            *printed += end;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
