// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! iTerm2 terminal adapter, driven entirely through AppleScript via
//! `osascript`. macOS-only at runtime; compiles everywhere since the actual
//! dependency is just the `osascript` binary being on `PATH`.

use super::{Liveness, SessionStyle, TerminalAdapter, TerminalError, TerminalHandle};
use crate::subprocess::{run_with_timeout, OSASCRIPT_TIMEOUT, SPAWN_TIMEOUT};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;
use tokio::process::Command;

#[derive(Clone, Copy, Debug, Default)]
pub struct ItermAdapter;

impl ItermAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Run an AppleScript snippet via `osascript -e`, returning trimmed stdout.
async fn run_applescript(script: &str, timeout: std::time::Duration) -> Result<String, TerminalError> {
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    let output = run_with_timeout(cmd, timeout, "osascript")
        .await
        .map_err(TerminalError::CommandFailed)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TerminalError::CommandFailed(stderr.to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Split a composite `"{window_id}:{session_id}"` handle id.
fn split_handle(handle: &TerminalHandle) -> Result<(&str, &str), TerminalError> {
    handle
        .id
        .split_once(':')
        .ok_or_else(|| TerminalError::NotFound(handle.id.clone()))
}

fn applescript_quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl TerminalAdapter for ItermAdapter {
    fn kind(&self) -> TerminalKind {
        TerminalKind::ITerm
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
        let command_line = argv.join(" ");
        let shell_line = format!(
            "cd {} && {}",
            shell_quote(&directory.display().to_string()),
            command_line
        );
        let script = format!(
            r#"tell application "iTerm2"
                set newWindow to (create window with default profile)
                tell current session of newWindow
                    write text "{}"
                end tell
                return (id of newWindow as text) & ":" & (id of current session of newWindow)
            end tell"#,
            applescript_quote(&shell_line)
        );
        let result = run_applescript(&script, SPAWN_TIMEOUT).await?;
        if result.is_empty() {
            return Err(TerminalError::SpawnFailed(
                "iTerm2 returned an empty window/session id".to_string(),
            ));
        }
        Ok(TerminalHandle::new(result, None))
    }

    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError> {
        let (_, session_id) = split_handle(handle)?;
        let script = format!(
            r#"tell application "iTerm2" to tell session id "{}" to write text "{}" newline NO"#,
            applescript_quote(session_id),
            applescript_quote(text)
        );
        run_applescript(&script, OSASCRIPT_TIMEOUT).await.map(|_| ())
    }

    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let (_, session_id) = split_handle(handle)?;
        let script = format!(
            r#"tell application "iTerm2" to tell session id "{}" to write text "" newline YES"#,
            applescript_quote(session_id)
        );
        run_applescript(&script, OSASCRIPT_TIMEOUT).await.map(|_| ())
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        let Ok((_, session_id)) = split_handle(handle) else {
            return Liveness::Unknown;
        };
        let script = format!(
            r#"tell application "iTerm2" to get (exists session id "{}")"#,
            applescript_quote(session_id)
        );
        match run_applescript(&script, OSASCRIPT_TIMEOUT).await {
            Ok(out) if out == "true" => Liveness::Alive,
            Ok(_) => Liveness::Dead,
            Err(_) => Liveness::Unknown,
        }
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let (window_id, _) = split_handle(handle)?;
        let script = format!(
            r#"tell application "iTerm2" to close (first window whose id is {})"#,
            window_id
        );
        // Best-effort: the window may already be gone.
        let _ = run_applescript(&script, OSASCRIPT_TIMEOUT).await;
        Ok(())
    }

    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError> {
        let (_, session_id) = split_handle(handle)?;
        let script = format!(
            r#"tell application "iTerm2" to tell session id "{}" to get contents"#,
            applescript_quote(session_id)
        );
        let contents = run_applescript(&script, OSASCRIPT_TIMEOUT).await?;
        Ok(tail_lines(&contents, lines))
    }

    async fn configure(
        &self,
        handle: &TerminalHandle,
        style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        let Ok((_, session_id)) = split_handle(handle) else {
            return Ok(());
        };
        if let Some(ref title) = style.title {
            let script = format!(
                r#"tell application "iTerm2" to tell session id "{}" to set name to "{}""#,
                applescript_quote(session_id),
                applescript_quote(title)
            );
            let _ = run_applescript(&script, OSASCRIPT_TIMEOUT).await;
        }
        Ok(())
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn tail_lines(text: &str, n: u32) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(n as usize);
    all[start..].join("\n")
}

#[cfg(test)]
#[path = "iterm_tests.rs"]
mod tests;
