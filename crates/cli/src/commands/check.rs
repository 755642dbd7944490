// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq check` - Validate the configuration

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::config::Config;
use crate::output::{write_json, OutputFormat};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    source: Option<String>,
    hosts: usize,
    groups: Vec<&'a str>,
    wait_timeout_ms: u128,
    poll_interval_ms: u128,
    connect_timeout_ms: u128,
}

impl<'a> CheckReport<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            source: config.source.as_ref().map(|p| p.display().to_string()),
            hosts: config.hosts.len(),
            groups: config.groups(),
            wait_timeout_ms: config.wait_timeout.as_millis(),
            poll_interval_ms: config.poll_interval.as_millis(),
            connect_timeout_ms: config.connect_timeout.as_millis(),
        }
    }
}

/// Loading the config already validated it; this reports what was loaded.
pub fn check(config: &Config, format: OutputFormat) -> Result<()> {
    write_check(&mut std::io::stdout().lock(), config, format)
}

fn write_check(
    out: &mut (impl Write + ?Sized),
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let report = CheckReport::new(config);
    match format {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => {
            let source = report.source.as_deref().unwrap_or("(defaults)");
            writeln!(out, "config ok: {}", source)?;
            writeln!(out, "{} hosts in {} groups", report.hosts, report.groups.len())?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
