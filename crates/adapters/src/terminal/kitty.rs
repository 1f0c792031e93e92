// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kitty terminal adapter, driven through `kitty @` remote control.
//!
//! kitty's remote control surfaces a real window id and a JSON `ls` listing,
//! so liveness here is a real Alive/Dead answer rather than `Unknown` — a
//! window missing from `kitty @ ls` has been closed, which callers map to
//! `ProcessDied` the same way a dead child process would be.

use super::{Liveness, SessionStyle, TerminalAdapter, TerminalError, TerminalHandle};
use crate::subprocess::{run_with_timeout, KITTY_TIMEOUT, SPAWN_TIMEOUT};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;
use tokio::process::Command;

#[derive(Clone, Copy, Debug, Default)]
pub struct KittyAdapter;

impl KittyAdapter {
    pub fn new() -> Self {
        Self
    }
}

async fn kitty_at(args: &[&str], timeout: std::time::Duration) -> Result<String, TerminalError> {
    let mut cmd = Command::new("kitty");
    cmd.arg("@");
    cmd.args(args);
    let output = run_with_timeout(cmd, timeout, "kitty @")
        .await
        .map_err(TerminalError::CommandFailed)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TerminalError::CommandFailed(stderr.to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn window_match(handle: &TerminalHandle) -> String {
    format!("id:{}", handle.id)
}

/// Parse the top-level `kitty @ ls` JSON for all window ids across all
/// os-windows and tabs.
fn extract_window_ids(ls_json: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(ls_json) else {
        return Vec::new();
    };
    let mut ids = Vec::new();
    if let Some(os_windows) = value.as_array() {
        for osw in os_windows {
            let Some(tabs) = osw.get("tabs").and_then(|t| t.as_array()) else {
                continue;
            };
            for tab in tabs {
                let Some(windows) = tab.get("windows").and_then(|w| w.as_array()) else {
                    continue;
                };
                for w in windows {
                    if let Some(id) = w.get("id") {
                        ids.push(id.to_string());
                    }
                }
            }
        }
    }
    ids
}

#[async_trait]
impl TerminalAdapter for KittyAdapter {
    fn kind(&self) -> TerminalKind {
        TerminalKind::Kitty
    }

    async fn spawn(
        &self,
        directory: &Path,
        argv: &[String],
    ) -> Result<TerminalHandle, TerminalError> {
        if !directory.exists() {
            return Err(TerminalError::SpawnFailed(format!(
                "working directory does not exist: {}",
                directory.display()
            )));
        }
        let mut args: Vec<&str> = vec![
            "launch",
            "--type=os-window",
            "--cwd",
        ];
        let cwd_str = directory.display().to_string();
        args.push(&cwd_str);
        args.push("--");
        let argv_refs: Vec<&str> = argv.iter().map(|s| s.as_str()).collect();
        args.extend(argv_refs.iter());

        let id = kitty_at(&args, SPAWN_TIMEOUT)
            .await
            .map_err(|e| TerminalError::SpawnFailed(e.to_string()))?;
        if id.is_empty() {
            return Err(TerminalError::SpawnFailed(
                "kitty @ launch returned no window id".to_string(),
            ));
        }
        Ok(TerminalHandle::new(id, None))
    }

    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError> {
        let matcher = window_match(handle);
        kitty_at(&["send-text", "--match", &matcher, text], KITTY_TIMEOUT)
            .await
            .map(|_| ())
    }

    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let matcher = window_match(handle);
        kitty_at(&["send-text", "--match", &matcher, "\r"], KITTY_TIMEOUT)
            .await
            .map(|_| ())
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        match kitty_at(&["ls"], KITTY_TIMEOUT).await {
            Ok(ls_json) => {
                if extract_window_ids(&ls_json).iter().any(|id| id == &handle.id) {
                    Liveness::Alive
                } else {
                    Liveness::Dead
                }
            }
            Err(_) => Liveness::Unknown,
        }
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let matcher = window_match(handle);
        let _ = kitty_at(&["close-window", "--match", &matcher], KITTY_TIMEOUT).await;
        Ok(())
    }

    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError> {
        let matcher = window_match(handle);
        let text = kitty_at(&["get-text", "--match", &matcher], KITTY_TIMEOUT).await?;
        let all: Vec<&str> = text.lines().collect();
        let start = all.len().saturating_sub(lines as usize);
        Ok(all[start..].join("\n"))
    }

    async fn configure(
        &self,
        handle: &TerminalHandle,
        style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        if let Some(ref title) = style.title {
            let matcher = window_match(handle);
            let _ = kitty_at(
                &["set-window-title", "--match", &matcher, title],
                KITTY_TIMEOUT,
            )
            .await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "kitty_tests.rs"]
mod tests;
