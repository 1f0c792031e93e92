// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session monitor (§5 scheduling model, §9 design notes): a dedicated
//! lightweight task that owns one session's output stream. It polls the
//! terminal adapter for the latest captured output, feeds it through the CLI
//! adapter's parser and idle-signature check, and publishes the resulting
//! events to the Session Manager over a channel — the monitor never mutates
//! `Session` state directly, it only observes and reports.
//!
//! Cancellation is cooperative (§5): the monitor checks `stopping` once per
//! poll tick and exits without emitting further events once it is set.

use foreman_adapters::cli::CliAdapter;
use foreman_adapters::terminal::{Liveness, TerminalAdapter, TerminalHandle};
use foreman_core::{Event, SessionId, TaskId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Number of trailing lines captured from the terminal on each poll.
pub(crate) const CAPTURE_LINES: u32 = 200;

/// Handle to a running monitor task. Dropping this does not stop the task;
/// call `stop` (sets the cooperative flag the task polls).
pub struct MonitorHandle {
    stopping: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Requests that the monitor loop exit at its next poll tick.
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    pub fn abort(&self) {
        self.join.abort();
    }
}

/// Spawns the monitor task for one live session.
///
/// `event_tx` is shared by every session's monitor and by the watchdog; the
/// Session Manager is the single reader that folds events back into its
/// registry.
pub fn spawn_monitor<C, T>(
    task_id: TaskId,
    session_id: SessionId,
    cli: C,
    terminal: T,
    handle: TerminalHandle,
    event_tx: mpsc::Sender<Event>,
    poll_interval: Duration,
) -> MonitorHandle
where
    C: CliAdapter,
    T: TerminalAdapter,
{
    let stopping = Arc::new(AtomicBool::new(false));
    let loop_stopping = stopping.clone();

    let join = tokio::spawn(async move {
        let mut last_context_percent: Option<u8> = None;
        let mut was_idle = false;

        loop {
            if loop_stopping.load(Ordering::SeqCst) {
                break;
            }

            match terminal.is_alive(&handle).await {
                Liveness::Dead => {
                    let _ = event_tx
                        .send(Event::SessionProcessDied {
                            task_id: task_id.clone(),
                            session_id: session_id.clone(),
                        })
                        .await;
                    break;
                }
                Liveness::Alive | Liveness::Unknown => {}
            }

            match terminal.capture_output(&handle, CAPTURE_LINES).await {
                Ok(output) => {
                    if let Some(percent) = cli.parse_context_remaining(&output) {
                        if last_context_percent != Some(percent) {
                            last_context_percent = Some(percent);
                            let _ = event_tx
                                .send(Event::SessionContextUpdated {
                                    task_id: task_id.clone(),
                                    session_id: session_id.clone(),
                                    percent_remaining: percent,
                                })
                                .await;
                        }
                    }

                    let idle_now = cli.idle_signature(&output);
                    if idle_now && !was_idle {
                        let _ = event_tx
                            .send(Event::SessionIdle {
                                task_id: task_id.clone(),
                                session_id: session_id.clone(),
                            })
                            .await;
                    }
                    was_idle = idle_now;
                }
                Err(err) => {
                    tracing::warn!(task_id = %task_id, session_id = %session_id, error = %err, "monitor: capture_output failed");
                }
            }

            if loop_stopping.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(poll_interval).await;
        }
    });

    MonitorHandle {
        stopping,
        join,
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
