// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types that trigger state transitions in the session orchestration
//! core. Serializes with `{"type": "event:name", ...fields}` format.

use crate::session::SessionId;
use crate::signal::SessionFailure;
use crate::task::TaskId;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};

/// Status reported through the CLI callback endpoint (notify_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackStatus {
    InProgress,
    Completed,
    Failed,
}

/// Events that trigger state transitions in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "session:spawned")]
    SessionSpawned {
        task_id: TaskId,
        session_id: SessionId,
        pid: Option<u32>,
    },

    #[serde(rename = "session:spawn_failed")]
    SessionSpawnFailed { task_id: TaskId, reason: String },

    #[serde(rename = "session:context_updated")]
    SessionContextUpdated {
        task_id: TaskId,
        session_id: SessionId,
        percent_remaining: u8,
    },

    #[serde(rename = "session:idle")]
    SessionIdle {
        task_id: TaskId,
        session_id: SessionId,
    },

    #[serde(rename = "session:failed")]
    SessionFailed {
        task_id: TaskId,
        session_id: SessionId,
        reason: SessionFailure,
    },

    #[serde(rename = "session:process_died")]
    SessionProcessDied {
        task_id: TaskId,
        session_id: SessionId,
    },

    #[serde(rename = "session:exited")]
    SessionExited {
        task_id: TaskId,
        session_id: SessionId,
        exit_code: Option<i32>,
    },

    #[serde(rename = "task:queued")]
    TaskQueued { task_id: TaskId },

    #[serde(rename = "task:transitioned")]
    TaskTransitioned {
        task_id: TaskId,
        from: crate::task::TaskStatus,
        to: crate::task::TaskStatus,
    },

    #[serde(rename = "task:callback")]
    TaskCallback {
        task_id: TaskId,
        status: CallbackStatus,
        context_percent: Option<u8>,
        message: Option<String>,
    },

    #[serde(rename = "timer:fired")]
    TimerFired { id: TimerId },

    #[serde(rename = "system:shutdown")]
    Shutdown,

    /// Catch-all for forward compatibility.
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionSpawned { .. } => "session:spawned",
            Event::SessionSpawnFailed { .. } => "session:spawn_failed",
            Event::SessionContextUpdated { .. } => "session:context_updated",
            Event::SessionIdle { .. } => "session:idle",
            Event::SessionFailed { .. } => "session:failed",
            Event::SessionProcessDied { .. } => "session:process_died",
            Event::SessionExited { .. } => "session:exited",
            Event::TaskQueued { .. } => "task:queued",
            Event::TaskTransitioned { .. } => "task:transitioned",
            Event::TaskCallback { .. } => "task:callback",
            Event::TimerFired { .. } => "timer:fired",
            Event::Shutdown => "system:shutdown",
            Event::Custom => "custom",
        }
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Event::SessionSpawned { task_id, .. }
            | Event::SessionSpawnFailed { task_id, .. }
            | Event::SessionContextUpdated { task_id, .. }
            | Event::SessionIdle { task_id, .. }
            | Event::SessionFailed { task_id, .. }
            | Event::SessionProcessDied { task_id, .. }
            | Event::SessionExited { task_id, .. }
            | Event::TaskQueued { task_id }
            | Event::TaskTransitioned { task_id, .. }
            | Event::TaskCallback { task_id, .. } => Some(task_id),
            Event::TimerFired { .. } | Event::Shutdown | Event::Custom => None,
        }
    }

    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::SessionSpawned {
                task_id,
                session_id,
                ..
            } => format!("{t} task={task_id} session={session_id}"),
            Event::SessionSpawnFailed { task_id, reason } => {
                format!("{t} task={task_id} reason={reason}")
            }
            Event::SessionContextUpdated {
                task_id,
                percent_remaining,
                ..
            } => format!("{t} task={task_id} percent={percent_remaining}"),
            Event::SessionIdle { task_id, .. } => format!("{t} task={task_id}"),
            Event::SessionFailed {
                task_id, reason, ..
            } => format!("{t} task={task_id} reason={reason}"),
            Event::SessionProcessDied { task_id, .. } => format!("{t} task={task_id}"),
            Event::SessionExited {
                task_id, exit_code, ..
            } => format!("{t} task={task_id} exit={exit_code:?}"),
            Event::TaskQueued { task_id } => format!("{t} task={task_id}"),
            Event::TaskTransitioned { task_id, from, to } => {
                format!("{t} task={task_id} from={from} to={to}")
            }
            Event::TaskCallback {
                task_id, status, ..
            } => format!("{t} task={task_id} status={status:?}"),
            Event::TimerFired { id } => format!("{t} id={id}"),
            Event::Shutdown | Event::Custom => t.to_string(),
        }
    }
}
