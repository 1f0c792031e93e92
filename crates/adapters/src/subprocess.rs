// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for osascript (iTerm2) commands.
pub const OSASCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for `kitty @` remote-control commands.
pub const KITTY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for `wt.exe` / PowerShell commands.
pub const WINDOWS_TERMINAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for spawning a new terminal window.
pub const SPAWN_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for output-capture commands.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting
/// timeout expiration into a descriptive error message. The child process
/// is killed automatically if the timeout elapses (via the tokio `Child`
/// drop implementation).
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Err(format!(
            "{} timed out after {}s",
            description,
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
