// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `foreman start|stop|pause|restart|stop-all` — direct 1:1 calls onto the
//! daemon's task operations.

use anyhow::{anyhow, Result};
use foreman_core::Task;

use crate::client::Client;
use crate::output::{print_json, OutputFormat};

fn print_task(task: &Task, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}  {}", task.id, task.status),
        OutputFormat::Json => print_json(&serde_json::to_value(task)?),
    }
    Ok(())
}

pub async fn start(task_id: String, dangerous: bool, format: OutputFormat) -> Result<()> {
    let client = Client::connect_or_start().await.map_err(|e| anyhow!("{e}"))?;
    let task = client.start(&task_id, dangerous).await.map_err(|e| anyhow!("{e}"))?;
    print_task(&task, format)
}

pub async fn stop(task_id: String, format: OutputFormat) -> Result<()> {
    let client = Client::connect().await.map_err(|e| anyhow!("{e}"))?;
    let task = client.stop(&task_id).await.map_err(|e| anyhow!("{e}"))?;
    print_task(&task, format)
}

pub async fn pause(task_id: String, format: OutputFormat) -> Result<()> {
    let client = Client::connect().await.map_err(|e| anyhow!("{e}"))?;
    let task = client.pause(&task_id).await.map_err(|e| anyhow!("{e}"))?;
    print_task(&task, format)
}

pub async fn restart(task_id: String, reason: String, format: OutputFormat) -> Result<()> {
    let client = Client::connect_or_start().await.map_err(|e| anyhow!("{e}"))?;
    let task = client.restart(&task_id, &reason).await.map_err(|e| anyhow!("{e}"))?;
    print_task(&task, format)
}

pub async fn stop_all(format: OutputFormat) -> Result<()> {
    let client = Client::connect().await.map_err(|e| anyhow!("{e}"))?;
    let results = client.stop_all().await.map_err(|e| anyhow!("{e}"))?;

    match format {
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No active tasks.");
            }
            for entry in &results {
                match &entry.error {
                    Some(err) => println!("{}  failed: {}", entry.task_id, err),
                    None => println!("{}  stopped", entry.task_id),
                }
            }
        }
        OutputFormat::Json => print_json(&serde_json::to_value(&results)?),
    }
    Ok(())
}
