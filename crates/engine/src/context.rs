// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context Manager (§4.4): advises the Session Manager when a session's
//! context window is close enough to exhaustion to warrant a restart.
//! `foreman_core::Session` already enforces the monotone-decreasing
//! invariant on `last_context_percent`; this module adds the trend history
//! and the restart-advisory policy on top of it.

use foreman_core::{Session, SessionId, Settings};
use std::collections::{HashMap, VecDeque};

/// Number of recent readings kept per session for trend inspection.
const TREND_WINDOW: usize = 10;

#[derive(Debug, Default)]
struct ContextState {
    trend_samples: VecDeque<u8>,
}

/// Tracks context-usage trend per live session. Restart *decisions* flow
/// through the Session Manager (§4.6 `restart`); this only advises.
#[derive(Debug, Default)]
pub struct ContextManager {
    sessions: HashMap<SessionId, ContextState>,
}

impl ContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly observed percentage for a session's trend history.
    /// Callers are expected to have already applied the percentage to the
    /// `Session` itself via `Session::observe_context_percent`.
    pub fn record_sample(&mut self, session_id: SessionId, percent: u8) {
        let state = self.sessions.entry(session_id).or_default();
        if state.trend_samples.len() == TREND_WINDOW {
            state.trend_samples.pop_front();
        }
        state.trend_samples.push_back(percent);
    }

    pub fn trend(&self, session_id: &SessionId) -> &[u8] {
        self.sessions
            .get(session_id)
            .map(|s| s.trend_samples.as_slices().0)
            .unwrap_or(&[])
    }

    pub fn forget(&mut self, session_id: &SessionId) {
        self.sessions.remove(session_id);
    }

    /// True iff the session's last observed percentage is at or below the
    /// configured threshold *and* it has run for at least the configured
    /// minimum — prevents flapping on a spuriously low reading right after
    /// spawn.
    pub fn should_restart(session: &Session, settings: &Settings, now_epoch_ms: u64) -> bool {
        let Some(percent) = session.last_context_percent else {
            return false;
        };
        if percent > settings.context_restart_threshold_percent {
            return false;
        }
        let min_run_ms = settings.context_restart_minimum_run.as_millis() as u64;
        now_epoch_ms.saturating_sub(session.started_at_epoch_ms) >= min_run_ms
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
