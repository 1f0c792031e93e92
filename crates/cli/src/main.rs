// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! foreman - Session Orchestration Core CLI

mod client;
mod color;
mod commands;
mod daemon_process;
mod env;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{daemon, sessions, task};

#[derive(Parser)]
#[command(
    name = "foreman",
    version,
    about = "Administrative CLI for the foreman session orchestration daemon"
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a task's session, spawning the daemon first if needed
    Start {
        /// Task ID (as tracked in the project's task store)
        task_id: String,
        /// Run the CLI adapter with elevated/dangerous permissions
        #[arg(long)]
        dangerous: bool,
    },
    /// Stop a task's running session
    Stop {
        /// Task ID
        task_id: String,
    },
    /// Pause a task's session, preserving its context for a later restart
    Pause {
        /// Task ID
        task_id: String,
    },
    /// Restart a task's session
    Restart {
        /// Task ID
        task_id: String,
        /// Why the restart was requested (carried into the new session's context)
        #[arg(long, default_value = "manual restart")]
        reason: String,
    },
    /// Stop every active session
    StopAll,
    /// Show a point-in-time snapshot of the active session pool
    Sessions,
    /// Stream session pool snapshots as they change
    Watch,
    /// Daemon process management
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", format_error(&e));
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let matches = Cli::command().styles(color::styles()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let format = cli.output;

    match cli.command {
        Commands::Start { task_id, dangerous } => task::start(task_id, dangerous, format).await,
        Commands::Stop { task_id } => task::stop(task_id, format).await,
        Commands::Pause { task_id } => task::pause(task_id, format).await,
        Commands::Restart { task_id, reason } => task::restart(task_id, reason, format).await,
        Commands::StopAll => task::stop_all(format).await,
        Commands::Sessions => sessions::list(format).await,
        Commands::Watch => sessions::watch(format).await,
        Commands::Daemon(args) => daemon::daemon(args, format).await,
    }
}
