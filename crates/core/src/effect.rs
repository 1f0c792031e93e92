// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent side effects the executor needs to perform. Decision
//! logic throughout the engine returns `Effect`s rather than calling
//! adapters directly, so it can be unit-tested without I/O.

use crate::session::{CliKind, SessionId, TerminalKind};
use crate::task::TaskId;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Effects that need to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Emit an event into the system event bus.
    Emit { event: crate::event::Event },

    /// Spawn a new session for a task.
    SpawnSession {
        task_id: TaskId,
        cli: CliKind,
        terminal: TerminalKind,
        project_dir: PathBuf,
        /// Path to the rendered prompt file (initial_task or resume_task).
        prompt_file: PathBuf,
        dangerous: bool,
    },

    /// Send input to an existing session.
    SendToSession {
        session_id: SessionId,
        input: String,
    },

    /// Close a session (best-effort, idempotent).
    CloseSession { session_id: SessionId },

    /// Set a timer.
    SetTimer {
        id: TimerId,
        #[serde(with = "duration_secs")]
        duration: Duration,
    },

    /// Cancel a timer.
    CancelTimer { id: TimerId },

    /// Send a desktop notification.
    Notify { title: String, message: String },

    /// Push a session snapshot to all Status Broadcaster subscribers.
    Broadcast { task_id: TaskId },

    /// Persist a task's status fields to the task store.
    PersistTaskStatus { task_id: TaskId },
}

impl Effect {
    /// Effect name for tracing spans.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit { .. } => "emit",
            Effect::SpawnSession { .. } => "spawn_session",
            Effect::SendToSession { .. } => "send_to_session",
            Effect::CloseSession { .. } => "close_session",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Notify { .. } => "notify",
            Effect::Broadcast { .. } => "broadcast",
            Effect::PersistTaskStatus { .. } => "persist_task_status",
        }
    }

    /// Key-value pairs for structured logging.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit { event } => vec![("event", event.log_summary())],
            Effect::SpawnSession {
                task_id,
                cli,
                terminal,
                project_dir,
                ..
            } => vec![
                ("task_id", task_id.to_string()),
                ("cli", cli.to_string()),
                ("terminal", terminal.to_string()),
                ("project_dir", project_dir.display().to_string()),
            ],
            Effect::SendToSession { session_id, .. } => {
                vec![("session_id", session_id.to_string())]
            }
            Effect::CloseSession { session_id } => vec![("session_id", session_id.to_string())],
            Effect::SetTimer { id, duration } => vec![
                ("timer_id", id.to_string()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("timer_id", id.to_string())],
            Effect::Notify { title, .. } => vec![("title", title.clone())],
            Effect::Broadcast { task_id } => vec![("task_id", task_id.to_string())],
            Effect::PersistTaskStatus { task_id } => vec![("task_id", task_id.to_string())],
        }
    }
}

pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_timer_fields_include_millis() {
        let effect = Effect::SetTimer {
            id: TimerId::watchdog_sweep(),
            duration: Duration::from_secs(30),
        };
        let fields = effect.fields();
        assert!(fields.contains(&("duration_ms", "30000".to_string())));
        assert_eq!(effect.name(), "set_timer");
    }

    #[test]
    fn duration_secs_round_trips() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "duration_secs")]
            d: Duration,
        }
        let w = Wrapper {
            d: Duration::from_secs(45),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"d":45}"#);
    }
}
