// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sshq daemon` - Daemon management commands

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::client_lifecycle::daemon_stop;
use crate::config::Config;
use crate::output::{write_json, OutputFormat};

#[derive(Args, Debug)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand, Debug)]
pub enum DaemonCommand {
    /// Start the daemon if it is not running
    Start,
    /// Cancel running commands and stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

pub async fn daemon(args: DaemonArgs, config: &Config, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start => start(config).await,
        DaemonCommand::Stop => stop().await,
        DaemonCommand::Status => status(format).await,
    }
}

async fn start(config: &Config) -> Result<()> {
    let client = DaemonClient::connect_or_start(config).await.map_err(|e| anyhow!("{}", e))?;
    let version = client.hello().await.map_err(|e| anyhow!("{}", e))?;
    println!("Daemon running (version {})", version);
    Ok(())
}

async fn stop() -> Result<()> {
    match daemon_stop().await {
        Ok(true) => println!("Daemon stopped"),
        Ok(false) => println!("Daemon not running"),
        Err(e) => return Err(anyhow!("Failed to stop daemon: {}", e)),
    }
    Ok(())
}

async fn status(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::from_env().map_err(|e| anyhow!("{}", e))?;
    let status = match client.status().await {
        Ok(status) => status,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(anyhow!("{}", e)),
    };

    match format {
        OutputFormat::Json => write_json(
            &mut std::io::stdout().lock(),
            &serde_json::json!({
                "status": "running",
                "uptime_secs": status.uptime_secs,
                "uptime": format_uptime(status.uptime_secs),
                "commands": status.commands,
                "running": status.running,
            }),
        )?,
        OutputFormat::Text => {
            println!("Status: running");
            println!("Uptime: {}", format_uptime(status.uptime_secs));
            println!("Commands: {} ({} running)", status.commands, status.running);
        }
    }
    Ok(())
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            write_json(&mut std::io::stdout().lock(), &serde_json::json!({ "status": "not_running" }))
        }
        OutputFormat::Text => {
            println!("Daemon not running");
            Ok(())
        }
    }
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
