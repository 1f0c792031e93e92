// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! TimerId uniquely identifies a timer instance used for scheduling delayed
//! actions such as the watchdog sweep and per-task spawn timeouts.

use crate::task::TaskId;

crate::define_id! {
    /// Unique identifier for a timer instance.
    pub struct TimerId;
}

impl TimerId {
    /// Timer ID for the single recurring watchdog sweep.
    pub fn watchdog_sweep() -> Self {
        Self::new("watchdog:sweep")
    }

    /// Timer ID for a task's spawn-timeout deadline.
    pub fn spawn_timeout(task_id: &TaskId) -> Self {
        Self::new(format!("spawn-timeout:{}", task_id))
    }

    /// Timer ID for a task's stop grace-window deadline.
    pub fn stop_grace(task_id: &TaskId) -> Self {
        Self::new(format!("stop-grace:{}", task_id))
    }

    pub fn is_spawn_timeout(&self) -> bool {
        self.0.starts_with("spawn-timeout:")
    }

    pub fn is_stop_grace(&self) -> bool {
        self.0.starts_with("stop-grace:")
    }

    /// Extracts the task id portion from a per-task timer, if this is one.
    pub fn task_id_str(&self) -> Option<&str> {
        self.0
            .strip_prefix("spawn-timeout:")
            .or_else(|| self.0.strip_prefix("stop-grace:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_id_display() {
        let id = TimerId::new("test-timer");
        assert_eq!(id.to_string(), "test-timer");
    }

    #[test]
    fn spawn_timeout_round_trips_task_id() {
        let task_id = TaskId::new("t1");
        let timer = TimerId::spawn_timeout(&task_id);
        assert!(timer.is_spawn_timeout());
        assert_eq!(timer.task_id_str(), Some("t1"));
    }

    #[test]
    fn stop_grace_is_distinguishable_from_spawn_timeout() {
        let task_id = TaskId::new("t1");
        let stop = TimerId::stop_grace(&task_id);
        assert!(stop.is_stop_grace());
        assert!(!stop.is_spawn_timeout());
    }

    #[test]
    fn watchdog_sweep_is_a_fixed_id() {
        assert_eq!(TimerId::watchdog_sweep(), TimerId::watchdog_sweep());
    }
}
