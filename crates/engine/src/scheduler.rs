// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer bookkeeping, driven by the `Clock` abstraction so tests never
//! sleep for real (the spawn-timeout, stop-grace, and watchdog-sweep
//! timers all flow through here).

use foreman_core::TimerId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Timer {
    fires_at: Instant,
}

/// Tracks outstanding timers by `TimerId`. Firing is polled by the caller
/// (the daemon's main loop or the watchdog sweep), not pushed — this keeps
/// the scheduler itself synchronous and trivially testable.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timer(&mut self, id: TimerId, duration: Duration, now: Instant) {
        self.timers.insert(id, Timer { fires_at: now + duration });
    }

    pub fn cancel_timer(&mut self, id: &TimerId) {
        self.timers.remove(id);
    }

    /// Cancel every timer belonging to a task (both its spawn-timeout and
    /// stop-grace timers), used when a task leaves the registry entirely.
    pub fn cancel_timers_for_task(&mut self, task_id: &foreman_core::TaskId) {
        let task_id = task_id.to_string();
        self.timers
            .retain(|id, _| id.task_id_str() != Some(task_id.as_str()));
    }

    /// Drains and returns the ids of every timer that has fired by `now`.
    pub fn fired_timers(&mut self, now: Instant) -> Vec<TimerId> {
        let fired: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, t)| t.fires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &fired {
            self.timers.remove(id);
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.fires_at).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
