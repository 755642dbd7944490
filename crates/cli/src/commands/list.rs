// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq list` - List commands, newest first

use anyhow::Result;
use clap::Args;
use sshq_core::{CommandStatus, CommandSummary};

use crate::client::DaemonClient;
use crate::color::Painter;
use crate::exit_error::ExitError;
use crate::output::{write_commands, write_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only commands in this status (pending, running, completed, failed, cancelled)
    #[arg(short, long)]
    pub status: Option<String>,
}

pub async fn list(args: ListArgs, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::from_env().map_err(|e| e.into_exit())?;
    let commands = match client.list(args.status.as_deref()).await {
        Ok(commands) => commands,
        Err(e) if e.is_not_running() => {
            // Nothing to list, but a bad filter is still an error.
            if let Some(status) = &args.status {
                status.parse::<CommandStatus>().map_err(ExitError::usage)?;
            }
            Vec::<CommandSummary>::new()
        }
        Err(e) => return Err(e.into_exit()),
    };

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => write_json(&mut out, &commands)?,
        OutputFormat::Text if commands.is_empty() => println!("No commands"),
        OutputFormat::Text => write_commands(&mut out, &commands, Painter::detect())?,
    }
    Ok(())
}
