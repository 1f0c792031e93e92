// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watchdog (§4.5): a single supervisory loop, woken on a fixed interval,
//! that computes a liveness and an idle-lockup verdict for every live
//! session and coalesces them into at most one transition each sweep.
//!
//! Each session's verdict is computed and applied independently: an error
//! on one session (a hung adapter call, a missing task record) is logged
//! and the sweep moves on to the next session rather than aborting (§7).

use crate::checkbox;
use crate::error::SessionManagerError;
use crate::session_manager::SessionManager;
use foreman_adapters::cli::CliAdapter;
use foreman_adapters::notify::NotifyAdapter;
use foreman_adapters::terminal::{Liveness, TerminalAdapter};
use foreman_core::{Clock, Event, FailureReason, IdGen, SessionFailure, TaskId, TaskStatus};
use foreman_storage::TaskStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct WatchdogHandle {
    stopping: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl WatchdogHandle {
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub fn abort(&self) {
        self.join.abort();
    }
}

/// Verdict computed for one session during a sweep. At most one is acted on
/// per session per sweep (§4.5's coalescing rule) — `ProcessDied` always
/// wins over `IdleLockup` since a dead process cannot also be idle-locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Alive,
    ProcessDied,
    IdleLockup,
}

/// Spawns the watchdog as a background task driven by `clock` and `interval`
/// (§4.8: overridable via `crate::env::watchdog_interval_ms` for tests that
/// want a fast sweep without waiting out the real default).
pub fn spawn_watchdog<C, T, S, N, I, CLK>(
    manager: Arc<Mutex<SessionManager<C, T, S, N, I>>>,
    clock: CLK,
    interval: Duration,
) -> WatchdogHandle
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
    CLK: Clock,
{
    let stopping = Arc::new(AtomicBool::new(false));
    let loop_stopping = stopping.clone();
    let join = tokio::spawn(async move {
        loop {
            if loop_stopping.load(Ordering::SeqCst) {
                break;
            }
            {
                let mut guard = manager.lock().await;
                sweep(&mut guard, clock.epoch_ms()).await;
            }
            if loop_stopping.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(interval).await;
        }
    });
    WatchdogHandle { stopping, join }
}

/// Runs one sweep over every live session. Exposed standalone (not only via
/// `spawn_watchdog`) so tests can drive a sweep deterministically against a
/// `FakeClock`-stamped `now_epoch_ms` without waiting on a real interval.
pub async fn sweep<C, T, S, N, I>(manager: &mut SessionManager<C, T, S, N, I>, now_epoch_ms: u64)
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    let task_ids = manager.live_task_ids();
    for task_id in task_ids {
        if let Err(err) = sweep_one(manager, &task_id, now_epoch_ms).await {
            tracing::warn!(task_id = %task_id, error = %err, "watchdog: sweep failed for session, continuing");
        }
    }

    manager.advance_waiting_queue(now_epoch_ms).await;
}

async fn sweep_one<C, T, S, N, I>(
    manager: &mut SessionManager<C, T, S, N, I>,
    task_id: &TaskId,
    now_epoch_ms: u64,
) -> Result<(), SessionManagerError>
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    let verdict = compute_verdict(manager, task_id, now_epoch_ms).await;

    match verdict {
        Verdict::Alive => {
            manager.touch_liveness(task_id, now_epoch_ms);
            if manager.should_restart(task_id, now_epoch_ms) {
                tracing::info!(task_id = %task_id, "watchdog: context low, restarting session");
                manager.restart(task_id, now_epoch_ms, "context threshold reached").await?;
            }
            Ok(())
        }
        Verdict::ProcessDied => handle_process_died(manager, task_id, now_epoch_ms).await,
        Verdict::IdleLockup => handle_idle_lockup(manager, task_id, now_epoch_ms).await,
    }
}

/// Fails a task whose session's process has died. Shared by the sweep's own
/// liveness check and the daemon's event router, which reaches the same
/// verdict from the per-session monitor's `SessionProcessDied` event instead
/// of a sweep's `is_alive` poll.
pub async fn handle_process_died<C, T, S, N, I>(
    manager: &mut SessionManager<C, T, S, N, I>,
    task_id: &TaskId,
    now_epoch_ms: u64,
) -> Result<(), SessionManagerError>
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    tracing::warn!(task_id = %task_id, "watchdog: process died");
    if let Some(session) = manager.session_for(task_id) {
        manager.emit_event(Event::SessionFailed {
            task_id: task_id.clone(),
            session_id: session.id.clone(),
            reason: SessionFailure::WindowClosed,
        });
    }
    manager.stop(task_id).await?;
    manager
        .finish_task(task_id, TaskStatus::Failed, now_epoch_ms, Some(FailureReason::ProcessDied))
        .await
}

/// Resolves an idle-locked session via checkbox progress: complete work
/// either hands off to review or finishes the task; incomplete work fails
/// it. Shared by the sweep's idle-signature check and the daemon's event
/// router, which reaches the same verdict from the per-session monitor's
/// `SessionIdle` event instead of a sweep's `idle_signature` poll.
pub async fn handle_idle_lockup<C, T, S, N, I>(
    manager: &mut SessionManager<C, T, S, N, I>,
    task_id: &TaskId,
    now_epoch_ms: u64,
) -> Result<(), SessionManagerError>
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    let task = manager.task(task_id)?;
    let progress = checkbox::progress(&task.project_dir.join(&task.doc_path));
    manager.stop(task_id).await?;
    if progress.is_complete() {
        let review_enabled = task.review_mode.resolve(manager.settings().review_enabled);
        if review_enabled {
            tracing::info!(task_id = %task_id, "watchdog: idle lockup resolved as complete, entering review");
            manager.enter_review(task_id, now_epoch_ms).await
        } else {
            tracing::info!(task_id = %task_id, "watchdog: idle lockup resolved via checkbox progress");
            manager.finish_task(task_id, TaskStatus::Completed, now_epoch_ms, None).await
        }
    } else {
        tracing::info!(task_id = %task_id, "watchdog: idle lockup resolved via checkbox progress");
        manager
            .finish_task(task_id, TaskStatus::Failed, now_epoch_ms, Some(FailureReason::IdleLockup))
            .await
    }
}

async fn compute_verdict<C, T, S, N, I>(
    manager: &SessionManager<C, T, S, N, I>,
    task_id: &TaskId,
    now_epoch_ms: u64,
) -> Verdict
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    let Some((terminal, handle)) = manager.session_handle(task_id) else {
        return Verdict::Alive;
    };

    match terminal.is_alive(handle).await {
        Liveness::Dead => return Verdict::ProcessDied,
        Liveness::Alive => {}
        Liveness::Unknown => {
            if handle.pid.is_none() {
                let heartbeat_timeout = manager.settings().heartbeat_timeout.as_millis() as u64;
                let stale = manager
                    .session_for(task_id)
                    .map(|s| now_epoch_ms.saturating_sub(s.last_liveness_epoch_ms) >= heartbeat_timeout)
                    .unwrap_or(false);
                if stale {
                    return Verdict::ProcessDied;
                }
            }
        }
    }

    let Some(cli) = manager.cli_for(task_id) else {
        return Verdict::Alive;
    };
    match terminal.capture_output(handle, crate::monitor::CAPTURE_LINES).await {
        Ok(output) if cli.idle_signature(&output) => Verdict::IdleLockup,
        Ok(_) => Verdict::Alive,
        Err(err) => {
            tracing::warn!(task_id = %task_id, error = %err, "watchdog: capture_output failed, assuming alive");
            Verdict::Alive
        }
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
