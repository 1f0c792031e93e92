// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared error taxonomy. Each crate boundary wraps this in its own
//! `thiserror` enum with `#[from]`, but the kinds themselves are defined once
//! here so the HTTP layer can map them to status codes consistently.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreErrorKind {
    #[error("task is not in a state that allows this operation")]
    InvalidState,
    #[error("failed to spawn session: {0}")]
    SpawnFailed(String),
    #[error("spawn timed out")]
    SpawnTimeout,
    #[error("session process died")]
    ProcessDied,
    #[error("session is idle with incomplete work")]
    IdleLockup,
    #[error("context window exhausted")]
    ContextExhausted,
    #[error("maximum concurrent sessions reached, task queued")]
    CapacityReached,
    #[error("adapter unavailable: {0}")]
    AdapterUnavailable(String),
}

impl CoreErrorKind {
    /// Whether this kind represents a queued-not-failed outcome.
    pub fn is_queued(&self) -> bool {
        matches!(self, CoreErrorKind::CapacityReached)
    }
}
