// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's error taxonomy (§7): one `thiserror`-derived enum, kinds
//! not types, realizing the distilled spec's error table for everything
//! the Session Manager can return synchronously.

use foreman_adapters::terminal::TerminalError;
use foreman_core::{TaskId, TaskStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error("task {task_id} is {status}, which cannot be started")]
    InvalidState { task_id: TaskId, status: TaskStatus },

    #[error("task {task_id} queued: {active}/{max_concurrent} slots in use")]
    Queued {
        task_id: TaskId,
        active: usize,
        max_concurrent: usize,
    },

    #[error("spawn failed for task {task_id}: {source}")]
    SpawnFailed {
        task_id: TaskId,
        #[source]
        source: TerminalError,
    },

    #[error("spawn timed out for task {task_id} after {elapsed_ms}ms")]
    SpawnTimeout { task_id: TaskId, elapsed_ms: u64 },

    #[error("no adapter available for task {task_id}: {message}")]
    AdapterUnavailable { task_id: TaskId, message: String },

    #[error("task {task_id} has no live session to act on")]
    NoSession { task_id: TaskId },

    #[error("storage error: {0}")]
    Storage(#[from] foreman_storage::StorageError),
}

impl SessionManagerError {
    /// Stable machine-readable tag, used by the HTTP layer to choose a
    /// status code without re-deriving it from the error message.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionManagerError::InvalidState { .. } => "invalid_state",
            SessionManagerError::Queued { .. } => "queued",
            SessionManagerError::SpawnFailed { .. } => "spawn_failed",
            SessionManagerError::SpawnTimeout { .. } => "spawn_timeout",
            SessionManagerError::AdapterUnavailable { .. } => "adapter_unavailable",
            SessionManagerError::NoSession { .. } => "no_session",
            SessionManagerError::Storage(_) => "storage_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_is_not_an_error_surfaced_as_failure_kind() {
        let err = SessionManagerError::Queued {
            task_id: TaskId::new("t1"),
            active: 4,
            max_concurrent: 4,
        };
        assert_eq!(err.kind(), "queued");
    }

    #[test]
    fn invalid_state_kind_is_stable() {
        let err = SessionManagerError::InvalidState {
            task_id: TaskId::new("t1"),
            status: TaskStatus::Completed,
        };
        assert_eq!(err.kind(), "invalid_state");
    }
}
