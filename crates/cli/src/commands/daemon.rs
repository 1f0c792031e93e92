// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `foreman daemon` — daemon process management commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::{Client, ClientError};
use crate::daemon_process;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon in the background if it isn't already running
    Start,
    /// Stop the daemon
    Stop,
    /// Check whether the daemon is reachable
    Status,
    /// Stop and restart the daemon
    Restart,
}

pub async fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start => start(format).await,
        DaemonCommand::Stop => stop(format).await,
        DaemonCommand::Status => status(format).await,
        DaemonCommand::Restart => restart(format).await,
    }
}

fn not_running(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("Daemon not running"),
        OutputFormat::Json => println!(r#"{{ "status": "not_running" }}"#),
    }
    Ok(())
}

async fn start(format: OutputFormat) -> Result<()> {
    if Client::connect().await.is_ok() {
        match format {
            OutputFormat::Text => println!("Daemon already running"),
            OutputFormat::Json => println!(r#"{{ "status": "already_running" }}"#),
        }
        return Ok(());
    }

    Client::connect_or_start().await.map_err(|e| anyhow!("{e}"))?;
    match format {
        OutputFormat::Text => println!("Daemon started"),
        OutputFormat::Json => println!(r#"{{ "status": "started" }}"#),
    }
    Ok(())
}

async fn stop(format: OutputFormat) -> Result<()> {
    match daemon_process::read_daemon_pid()? {
        Some(_) => {
            daemon_process::stop_daemon_sync();
            match format {
                OutputFormat::Text => println!("Daemon stopped"),
                OutputFormat::Json => println!(r#"{{ "status": "stopped" }}"#),
            }
        }
        None => return not_running(format),
    }
    Ok(())
}

async fn status(format: OutputFormat) -> Result<()> {
    let client = match Client::connect().await {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => return not_running(format),
        Err(e) => return Err(anyhow!("{e}")),
    };

    let snapshot = client.sessions().await.map_err(|e| anyhow!("{e}"))?;

    match format {
        OutputFormat::Text => {
            println!("Status: running");
            println!(
                "Sessions: {} of {} slots in use",
                snapshot.count, snapshot.max_concurrent
            );
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "status": "running",
                "sessions_active": snapshot.count,
                "max_concurrent": snapshot.max_concurrent,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}

async fn restart(format: OutputFormat) -> Result<()> {
    if let Some(pid) = daemon_process::read_daemon_pid()? {
        daemon_process::stop_daemon_sync();
        daemon_process::wait_for_exit(pid, crate::env::timeout_exit()).await;
    }

    Client::connect_or_start().await.map_err(|e| anyhow!("{e}"))?;
    match format {
        OutputFormat::Text => println!("Daemon restarted"),
        OutputFormat::Json => println!(r#"{{ "status": "restarted" }}"#),
    }
    Ok(())
}
