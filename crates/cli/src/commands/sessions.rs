// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `foreman sessions` and `foreman watch` — read the pool snapshot once, or
//! stream it continuously over the daemon's `/subscribe` WebSocket.

use anyhow::{anyhow, Result};
use futures_util::StreamExt;
use foreman_engine::PoolSnapshot;

use crate::client::Client;
use crate::output::{format_time_ago, print_json, OutputFormat};
use crate::table::{Column, Table};

fn render_snapshot(snapshot: &PoolSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let mut table = Table::new(vec![
                Column::left("TASK"),
                Column::status("STATUS"),
                Column::right("PID"),
                Column::left("STARTED"),
                Column::right("CTX%"),
            ]);
            for session in &snapshot.sessions {
                table.row(vec![
                    session.task_id.to_string(),
                    session.status.to_string(),
                    session.pid.map(|p| p.to_string()).unwrap_or_default(),
                    session
                        .started_at_epoch_ms
                        .map(format_time_ago)
                        .unwrap_or_else(|| "-".to_string()),
                    session
                        .context_usage_percent
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                ]);
            }
            let mut out = std::io::stdout();
            table.render(&mut out);
            println!(
                "\n{} of {} slots in use",
                snapshot.count, snapshot.max_concurrent
            );
        }
        OutputFormat::Json => print_json(&serde_json::to_value(snapshot)?),
    }
    Ok(())
}

pub async fn list(format: OutputFormat) -> Result<()> {
    let client = Client::connect().await.map_err(|e| anyhow!("{e}"))?;
    let snapshot = client.sessions().await.map_err(|e| anyhow!("{e}"))?;
    render_snapshot(&snapshot, format)
}

/// Stream pool snapshots as they're published, until the connection closes
/// or the process is interrupted.
pub async fn watch(format: OutputFormat) -> Result<()> {
    let base_url = crate::env::daemon_base_url().ok_or_else(|| anyhow!("daemon not running"))?;
    let ws_url = base_url.replacen("http://", "ws://", 1) + "/subscribe";

    let (stream, _) = tokio_tungstenite::connect_async(&ws_url)
        .await
        .map_err(|e| anyhow!("failed to connect to {ws_url}: {e}"))?;
    let (_write, mut read) = stream.split();

    while let Some(message) = read.next().await {
        let message = message.map_err(|e| anyhow!("websocket error: {e}"))?;
        if let tokio_tungstenite::tungstenite::Message::Text(text) = message {
            let snapshot: PoolSnapshot = serde_json::from_str(&text)
                .map_err(|e| anyhow!("malformed snapshot from daemon: {e}"))?;
            if matches!(format, OutputFormat::Text) {
                print!("\x1b[2J\x1b[H");
            }
            render_snapshot(&snapshot, format)?;
        }
    }
    Ok(())
}
