// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq cancel` - Stop a running command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::client::DaemonClient;
use crate::commands::status::absent_or;
use crate::output::{write_json, OutputFormat};

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Command id
    pub id: String,
}

#[derive(Serialize)]
struct Cancelled<'a> {
    id: &'a str,
    cancelled: bool,
}

/// Cancellation is cooperative: hosts wind down after this returns, and
/// `sshq status <id>` shows `cancelled` once they have.
pub async fn cancel(args: CancelArgs, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::from_env().map_err(|e| e.into_exit())?;
    client.cancel(&args.id).await.map_err(|e| absent_or(e, &args.id))?;

    match format {
        OutputFormat::Json => {
            write_json(&mut std::io::stdout().lock(), &Cancelled { id: &args.id, cancelled: true })?
        }
        OutputFormat::Text => println!("cancelling {}", args.id),
    }
    Ok(())
}
