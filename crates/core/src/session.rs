// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier and the in-memory live-session record.
//!
//! SessionId identifies a task's underlying terminal/process session. This is
//! distinct from TaskId, which identifies the persisted work item.

use crate::task::TaskId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a live session.
    ///
    /// A session is the underlying terminal + CLI process pair supervising a
    /// single task. At most one session exists per task at any instant.
    pub struct SessionId;
}

/// Which CLI a session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CliKind {
    Claude,
    Codex,
    Gemini,
}

impl std::fmt::Display for CliKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliKind::Claude => write!(f, "claude"),
            CliKind::Codex => write!(f, "codex"),
            CliKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// Which terminal emulator a session is running inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    ITerm,
    Kitty,
    WindowsTerminal,
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalKind::ITerm => write!(f, "iterm"),
            TerminalKind::Kitty => write!(f, "kitty"),
            TerminalKind::WindowsTerminal => write!(f, "windows_terminal"),
        }
    }
}

/// Run-phase of a live session, independent of the task's own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Running,
    Paused,
    Stopping,
}

/// The Session Manager's authoritative record for one live task execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub task_id: TaskId,
    pub cli: CliKind,
    pub terminal: TerminalKind,
    pub started_at_epoch_ms: u64,
    /// OS process id, when the terminal adapter exposes one.
    pub pid: Option<u32>,
    /// Last observed context-remaining percentage (monotone-decreasing).
    pub last_context_percent: Option<u8>,
    pub last_liveness_epoch_ms: u64,
    pub phase: RunPhase,
    /// Incremented on every restart; used to reject stale events raised by a
    /// superseded incarnation of this session.
    pub generation: u64,
}

impl Session {
    pub fn new(
        id: SessionId,
        task_id: TaskId,
        cli: CliKind,
        terminal: TerminalKind,
        started_at_epoch_ms: u64,
    ) -> Self {
        Self {
            id,
            task_id,
            cli,
            terminal,
            started_at_epoch_ms,
            pid: None,
            last_context_percent: None,
            last_liveness_epoch_ms: started_at_epoch_ms,
            phase: RunPhase::Running,
            generation: 0,
        }
    }

    /// Record a freshly observed context-remaining percentage, enforcing the
    /// monotone-decreasing invariant (a higher reading than the last one for
    /// this generation is ignored as noise).
    pub fn observe_context_percent(&mut self, percent: u8) {
        match self.last_context_percent {
            Some(prev) if percent > prev => {}
            _ => self.last_context_percent = Some(percent),
        }
    }

    pub fn bump_generation(&mut self) {
        self.generation += 1;
        self.last_context_percent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_percent_is_monotone_decreasing() {
        let mut session = Session::new(
            SessionId::new("s1"),
            TaskId::new("t1"),
            CliKind::Claude,
            TerminalKind::ITerm,
            0,
        );
        session.observe_context_percent(80);
        session.observe_context_percent(95); // noise, ignored
        assert_eq!(session.last_context_percent, Some(80));
        session.observe_context_percent(40);
        assert_eq!(session.last_context_percent, Some(40));
    }

    #[test]
    fn bump_generation_resets_context_tracking() {
        let mut session = Session::new(
            SessionId::new("s1"),
            TaskId::new("t1"),
            CliKind::Claude,
            TerminalKind::ITerm,
            0,
        );
        session.observe_context_percent(10);
        session.bump_generation();
        assert_eq!(session.generation, 1);
        assert_eq!(session.last_context_percent, None);
    }
}
