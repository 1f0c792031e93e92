// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::path::PathBuf;
use std::time::Duration;

/// State directory override (default: `~/.local/state/foreman`).
pub fn state_dir() -> PathBuf {
    std::env::var("FOREMAN_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs_state_dir_fallback().join("foreman")
        })
}

fn dirs_state_dir_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".local").join("state"))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Watchdog sweep interval override, for test speedup (default: the
/// `Settings::watchdog_interval` the daemon was started with).
pub fn watchdog_interval_ms() -> Option<Duration> {
    std::env::var("FOREMAN_WATCHDOG_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Per-session monitor poll interval (default: 1000ms).
pub fn monitor_poll_ms() -> Duration {
    std::env::var("FOREMAN_MONITOR_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1))
}

/// Poll interval between startup-dialog clearing attempts (default: 300ms).
pub fn startup_dialog_poll_ms() -> Duration {
    std::env::var("FOREMAN_STARTUP_DIALOG_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(300))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
