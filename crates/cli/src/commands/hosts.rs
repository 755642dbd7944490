// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq hosts` - List configured targets

use anyhow::Result;
use clap::Args;
use sshq_core::HostTarget;

use crate::config::Config;
use crate::exit_error::ExitError;
use crate::inventory::InventoryError;
use crate::output::{write_hosts, write_json, OutputFormat};

#[derive(Args, Debug)]
pub struct HostsArgs {
    /// Only list hosts in this group
    #[arg(short, long)]
    pub group: Option<String>,
}

pub fn hosts(args: HostsArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let selected = select(&config.hosts, args.group.as_deref())?;
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => write_json(&mut out, &selected)?,
        OutputFormat::Text if selected.is_empty() => println!("No hosts configured"),
        OutputFormat::Text => write_hosts(&mut out, &selected)?,
    }
    Ok(())
}

fn select(hosts: &[HostTarget], group: Option<&str>) -> Result<Vec<HostTarget>, ExitError> {
    let Some(group) = group else {
        return Ok(hosts.to_vec());
    };
    let selected: Vec<_> = hosts.iter().filter(|h| h.group() == group).cloned().collect();
    if selected.is_empty() {
        return Err(ExitError::usage(InventoryError::EmptyGroup(group.to_string())));
    }
    Ok(selected)
}

#[cfg(test)]
#[path = "hosts_tests.rs"]
mod tests;
