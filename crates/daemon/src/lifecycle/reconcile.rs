// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup reconciliation (§9's "Restart on startup" design note).
//!
//! The core has no reliable way to re-attach to a terminal it did not
//! spawn this process: `TerminalAdapter` only knows how to drive handles it
//! created itself, not rediscover one by PID. So for every task persisted
//! as `in_progress`/`in_reviewing` across a restart, this best-effort kills
//! any process still running at the recorded PID (so it isn't left
//! orphaned, mirroring the teacher's orphan-session cleanup) and then
//! unconditionally marks the task `Failed` with `RecoveryFailed` — no task
//! is left dangling in a live-looking state the daemon can't actually
//! supervise.

use foreman_core::{FailureReason, TaskStatus};
use foreman_storage::TaskStore;

use super::AppSessionManager;

/// Walks the task store for tasks left `in_progress`/`in_reviewing` by a
/// prior process, best-effort kills any surviving PID, and marks each
/// `Failed(RecoveryFailed)`. Returns the number of tasks recovered this way.
pub async fn reconcile_startup<S: TaskStore>(manager: &mut AppSessionManager, task_store: &S) -> usize {
    let tasks = match task_store.list_all() {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::error!(error = %e, "could not list tasks for startup reconciliation");
            return 0;
        }
    };

    let mut recovered = 0;
    for task in tasks {
        if !task.status.has_live_session() {
            continue;
        }

        if let Some(pid) = task.last_pid {
            kill_orphan(pid).await;
        }

        let task_id = task.id.clone();
        match manager
            .finish_task(&task_id, TaskStatus::Failed, now_epoch_ms(), Some(FailureReason::RecoveryFailed))
            .await
        {
            Ok(()) => {
                recovered += 1;
                tracing::warn!(task_id = %task_id, pid = ?task.last_pid, "recovered stale in-flight task as failed");
            }
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "failed to reconcile stale task");
            }
        }
    }
    recovered
}

/// Best-effort SIGKILL of a process left behind by the previous daemon
/// process, if it's still alive. Errors are swallowed: the process may
/// already be gone, which is the common case.
async fn kill_orphan(pid: u32) {
    let _ = tokio::process::Command::new("kill")
        .args(["-9", &pid.to_string()])
        .output()
        .await;
}

fn now_epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
