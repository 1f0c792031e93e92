// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// The daemon's HTTP address, default `127.0.0.1:4505`. Must agree with the
/// daemon's own `FOREMAN_HTTP_ADDR` resolution in `foreman-daemon`'s `env.rs`.
pub fn http_addr() -> Option<SocketAddr> {
    match std::env::var("FOREMAN_HTTP_ADDR") {
        Ok(raw) => raw.parse().ok(),
        Err(_) => Some(([127, 0, 0, 1], 4505).into()),
    }
}

/// Base URL derived from [`http_addr`], or `None` if `FOREMAN_HTTP_ADDR` is
/// set but unparseable.
pub fn daemon_base_url() -> Option<String> {
    http_addr().map(|addr| format!("http://{addr}"))
}

/// State directory override (default: `~/.local/state/foreman`), used to
/// locate the daemon's lock file so `foreman daemon status` can report a pid.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FOREMAN_STATE_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".local/state/foreman")
}

/// Override for the `foremand` binary path, for dev builds and tests.
pub fn daemon_binary() -> Option<String> {
    std::env::var("FOREMAN_DAEMON_BINARY").ok()
}

pub fn cargo_manifest_dir() -> Option<String> {
    std::env::var("CARGO_MANIFEST_DIR").ok()
}

/// Timeout waiting for a freshly-spawned daemon to start accepting
/// connections (default 5s).
pub fn timeout_connect() -> Duration {
    parse_duration_ms("FOREMAN_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout waiting for the daemon process to exit after a stop signal
/// (default 2s).
pub fn timeout_exit() -> Duration {
    parse_duration_ms("FOREMAN_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval while waiting for the daemon to come up (default 50ms).
pub fn poll_interval() -> Duration {
    parse_duration_ms("FOREMAN_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

/// Whether color output should be enabled. Priority: `NO_COLOR=1` disables,
/// `COLOR=1` forces, otherwise TTY detection in [`crate::color`].
pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
