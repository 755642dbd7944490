// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sshq: run one shell command across many hosts

mod client;
mod client_lifecycle;
mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod inventory;
mod logging;
mod output;
mod session;
#[cfg(test)]
mod test_daemon;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{cancel, check, daemon, hosts, list, run, status};
use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "sshq",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Run a shell command on many hosts at once",
    styles = color::styles(),
)]
struct Cli {
    /// Config file (default: $SSHQ_CONFIG or ~/.config/sshq/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command on a group or a list of hosts
    Run(run::RunArgs),
    /// Show a command's output and status (default: the most recent)
    Status(status::StatusArgs),
    /// List commands, newest first
    List(list::ListArgs),
    /// Cancel a running command
    Cancel(cancel::CancelArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// List configured hosts
    Hosts(hosts::HostsArgs),
    /// Validate the configuration
    Check,
}

fn main() {
    let result = match tokio::runtime::Runtime::new() {
        Ok(runtime) => {
            let result = runtime.block_on(execute());
            // Commands live in the daemon; nothing here outlives the runtime.
            drop(runtime);
            result
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("Error: {}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn execute() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| ExitError::usage(format!("invalid config: {}", e)))?;
    let _log_guard = logging::init(config.log_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => run::run(args, &config, cli.output).await,
        Commands::Status(args) => status::status(args, cli.output).await,
        Commands::List(args) => list::list(args, cli.output).await,
        Commands::Cancel(args) => cancel::cancel(args, cli.output).await,
        Commands::Daemon(args) => daemon::daemon(args, &config, cli.output).await,
        Commands::Hosts(args) => hosts::hosts(args, &config, cli.output),
        Commands::Check => check::check(&config, cli.output),
    }
}
