// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide settings snapshot.
//!
//! Settings are published as an immutable snapshot (read-copy-update): a
//! writer builds a new `Settings` and swaps it in atomically; readers hold
//! on to the snapshot they started an operation with for its duration.

use crate::session::{CliKind, TerminalKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub default_cli: CliKind,
    pub review_cli: CliKind,
    pub review_enabled: bool,
    pub terminal_preference: Option<TerminalKind>,
    pub max_concurrent_sessions: usize,
    #[serde(with = "crate::effect::duration_secs")]
    pub watchdog_interval: Duration,
    #[serde(with = "crate::effect::duration_secs")]
    pub heartbeat_timeout: Duration,
    /// Percent of context remaining at or below which the Context Manager
    /// advises a restart.
    pub context_restart_threshold_percent: u8,
    /// Minimum time a session must have run before a restart advisory is honored.
    #[serde(with = "crate::effect::duration_secs")]
    pub context_restart_minimum_run: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_cli: CliKind::Claude,
            review_cli: CliKind::Codex,
            review_enabled: false,
            terminal_preference: None,
            max_concurrent_sessions: 4,
            watchdog_interval: Duration::from_secs(30),
            heartbeat_timeout: Duration::from_secs(300),
            context_restart_threshold_percent: 15,
            context_restart_minimum_run: Duration::from_secs(60),
        }
    }
}
