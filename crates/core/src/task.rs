// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identifier, status graph, and the persisted record the Task State
//! Machine drives.

use crate::session::CliKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

crate::define_id! {
    /// Unique identifier for a task.
    pub struct TaskId;
}

/// Legal task states. See the transition graph in `TaskStatus::can_transition_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    InReviewing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn has_live_session(self) -> bool {
        matches!(self, TaskStatus::InProgress | TaskStatus::InReviewing)
    }

    /// Whether `self -> next` appears in the state graph of the task state
    /// machine. This does not account for the review-enabled gate on
    /// `InProgress -> InReviewing`; callers use `TaskStatus::next_on_complete`
    /// for that decision.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, InReviewing)
                | (InProgress, Completed)
                | (InProgress, Failed)
                | (InReviewing, Completed)
                | (InReviewing, Failed)
                | (InProgress, Pending) // operator stop returns to pending
                | (InReviewing, Completed) // operator stop while reviewing
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::InReviewing => "in_reviewing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Per-task override of the global review-enabled setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    #[default]
    Inherit,
    ForceOn,
    ForceOff,
}

impl ReviewMode {
    pub fn resolve(self, global_review_enabled: bool) -> bool {
        match self {
            ReviewMode::Inherit => global_review_enabled,
            ReviewMode::ForceOn => true,
            ReviewMode::ForceOff => false,
        }
    }
}

/// Why a task transitioned to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ProcessDied,
    IdleLockup,
    SpawnFailed(String),
    SpawnTimeout,
    AdapterUnavailable(String),
    RecoveryFailed,
    /// The CLI self-reported failure through the notify_status callback
    /// rather than the core inferring it from output or liveness.
    ReportedFailure(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::ProcessDied => write!(f, "process died"),
            FailureReason::IdleLockup => write!(f, "idle lockup"),
            FailureReason::SpawnFailed(msg) => write!(f, "spawn failed: {msg}"),
            FailureReason::SpawnTimeout => write!(f, "spawn timed out"),
            FailureReason::AdapterUnavailable(msg) => write!(f, "adapter unavailable: {msg}"),
            FailureReason::RecoveryFailed => write!(f, "recovery failed on startup"),
            FailureReason::ReportedFailure(msg) => write!(f, "reported failure: {msg}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
}

/// A durable task record: the core's shadow of the fields it owns in the
/// external task store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_dir: PathBuf,
    pub doc_path: PathBuf,
    pub status: TaskStatus,
    pub cli_override: Option<CliKind>,
    pub review_mode: ReviewMode,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
    pub completed_at_epoch_ms: Option<u64>,
    pub failure_reason: Option<FailureReason>,
    /// The most recently spawned session for this task, kept across restarts
    /// so the daemon can attempt a PID-based reconnect.
    pub last_session_id: Option<String>,
    pub last_pid: Option<u32>,
}

impl Task {
    pub fn new(id: TaskId, project_dir: PathBuf, doc_path: PathBuf, now_epoch_ms: u64) -> Self {
        Self {
            id,
            project_dir,
            doc_path,
            status: TaskStatus::Pending,
            cli_override: None,
            review_mode: ReviewMode::default(),
            created_at_epoch_ms: now_epoch_ms,
            updated_at_epoch_ms: now_epoch_ms,
            completed_at_epoch_ms: None,
            failure_reason: None,
            last_session_id: None,
            last_pid: None,
        }
    }

    pub fn with_cli_override(mut self, cli: CliKind) -> Self {
        self.cli_override = Some(cli);
        self
    }

    pub fn with_review_mode(mut self, mode: ReviewMode) -> Self {
        self.review_mode = mode;
        self
    }

    /// Apply a transition, validating against the legal graph. On success
    /// updates `updated_at`/`completed_at`/`failure_reason` as appropriate.
    pub fn transition(
        &mut self,
        to: TaskStatus,
        now_epoch_ms: u64,
        failure_reason: Option<FailureReason>,
    ) -> Result<(), TaskError> {
        if !self.status.can_transition_to(to) {
            return Err(TaskError::InvalidTransition {
                task_id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at_epoch_ms = now_epoch_ms;
        if to == TaskStatus::Completed {
            self.completed_at_epoch_ms = Some(now_epoch_ms);
            self.failure_reason = None;
        }
        if to == TaskStatus::Failed {
            self.failure_reason = failure_reason;
        }
        if to == TaskStatus::Pending {
            self.last_session_id = None;
            self.last_pid = None;
        }
        Ok(())
    }
}
