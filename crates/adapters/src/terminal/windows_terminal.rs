// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows Terminal adapter, driven through `wt.exe` and PowerShell.
//!
//! `wt.exe` has no remote-control protocol: once a tab is launched there is
//! no handle back to it beyond the OS process tree. The adapter works around
//! this by having the launched command record its own PID to a marker file
//! before exec'ing the real CLI, then polls that PID through
//! `Get-Process`. There is no programmatic way to inject keystrokes into a
//! Windows Terminal tab without UI automation, so `send`/`send_enter`/
//! `capture_output` honestly report `Unsupported` rather than pretending.

use super::{Liveness, SessionStyle, TerminalAdapter, TerminalError, TerminalHandle};
use crate::subprocess::{run_with_timeout, SPAWN_TIMEOUT, WINDOWS_TERMINAL_TIMEOUT};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;
use tokio::process::Command;

const KIND_NAME: &str = "Windows Terminal";

#[derive(Clone, Copy, Debug, Default)]
pub struct WindowsTerminalAdapter;

impl WindowsTerminalAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TerminalAdapter for WindowsTerminalAdapter {
    fn kind(&self) -> TerminalKind {
        TerminalKind::WindowsTerminal
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
        let marker = std::env::temp_dir().join(format!("foreman-wt-{}.pid", uuid::Uuid::new_v4()));
        let inner_cmd = argv.join(" ");
        let powershell_line = format!(
            "$PID | Out-File -Encoding ascii '{}'; {}",
            marker.display(),
            inner_cmd
        );

        let mut cmd = Command::new("wt.exe");
        cmd.arg("-d")
            .arg(directory)
            .arg("powershell.exe")
            .arg("-NoExit")
            .arg("-Command")
            .arg(&powershell_line);

        let output = run_with_timeout(cmd, SPAWN_TIMEOUT, "wt.exe")
            .await
            .map_err(TerminalError::SpawnFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TerminalError::SpawnFailed(stderr.to_string()));
        }

        let pid = wait_for_marker_pid(&marker).await;
        Ok(TerminalHandle::new(marker.display().to_string(), pid))
    }

    async fn send(&self, _handle: &TerminalHandle, _text: &str) -> Result<(), TerminalError> {
        Err(TerminalError::Unsupported(
            KIND_NAME,
            "programmatic input injection is not available".to_string(),
        ))
    }

    async fn send_enter(&self, _handle: &TerminalHandle) -> Result<(), TerminalError> {
        Err(TerminalError::Unsupported(
            KIND_NAME,
            "programmatic input injection is not available".to_string(),
        ))
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        let Some(pid) = handle.pid else {
            return Liveness::Unknown;
        };
        let mut cmd = Command::new("powershell.exe");
        cmd.arg("-NoProfile")
            .arg("-Command")
            .arg(format!(
                "if (Get-Process -Id {} -ErrorAction SilentlyContinue) {{ 'alive' }} else {{ 'dead' }}",
                pid
            ));
        match run_with_timeout(cmd, WINDOWS_TERMINAL_TIMEOUT, "Get-Process").await {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout);
                if text.trim() == "alive" {
                    Liveness::Alive
                } else {
                    Liveness::Dead
                }
            }
            _ => Liveness::Unknown,
        }
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let Some(pid) = handle.pid else {
            return Ok(());
        };
        let mut cmd = Command::new("powershell.exe");
        cmd.arg("-NoProfile")
            .arg("-Command")
            .arg(format!("Stop-Process -Id {} -Force -ErrorAction SilentlyContinue", pid));
        let _ = run_with_timeout(cmd, WINDOWS_TERMINAL_TIMEOUT, "Stop-Process").await;
        Ok(())
    }

    async fn capture_output(
        &self,
        _handle: &TerminalHandle,
        _lines: u32,
    ) -> Result<String, TerminalError> {
        Err(TerminalError::Unsupported(
            KIND_NAME,
            "output capture requires a ConPTY hook not implemented here".to_string(),
        ))
    }

    async fn configure(
        &self,
        _handle: &TerminalHandle,
        _style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        Ok(())
    }
}

/// Poll the marker file for up to ~3s for the PID written by the launched
/// PowerShell wrapper.
async fn wait_for_marker_pid(marker: &Path) -> Option<u32> {
    for _ in 0..15 {
        if let Ok(contents) = tokio::fs::read_to_string(marker).await {
            if let Ok(pid) = contents.trim().parse::<u32>() {
                return Some(pid);
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
    None
}

#[cfg(test)]
#[path = "windows_terminal_tests.rs"]
mod tests;
