// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use foreman_core::TaskId;

#[test]
fn fired_timers_returns_only_due_timers() {
    let mut s = Scheduler::new();
    let now = Instant::now();
    s.set_timer(TimerId::watchdog_sweep(), Duration::from_secs(10), now);
    let task = TaskId::new("t1");
    s.set_timer(TimerId::spawn_timeout(&task), Duration::from_secs(1), now);

    assert!(s.fired_timers(now).is_empty());

    let fired = s.fired_timers(now + Duration::from_secs(5));
    assert_eq!(fired, vec![TimerId::spawn_timeout(&task)]);
    assert!(s.has_timers());
}

#[test]
fn cancel_timer_removes_it() {
    let mut s = Scheduler::new();
    let now = Instant::now();
    s.set_timer(TimerId::watchdog_sweep(), Duration::from_secs(1), now);
    s.cancel_timer(&TimerId::watchdog_sweep());
    assert!(s.fired_timers(now + Duration::from_secs(2)).is_empty());
}

#[test]
fn cancel_timers_for_task_clears_both_spawn_and_stop_timers() {
    let mut s = Scheduler::new();
    let now = Instant::now();
    let task = TaskId::new("t1");
    s.set_timer(TimerId::spawn_timeout(&task), Duration::from_secs(1), now);
    s.set_timer(TimerId::stop_grace(&task), Duration::from_secs(1), now);
    s.set_timer(TimerId::watchdog_sweep(), Duration::from_secs(1), now);

    s.cancel_timers_for_task(&task);

    let fired = s.fired_timers(now + Duration::from_secs(2));
    assert_eq!(fired, vec![TimerId::watchdog_sweep()]);
}

#[test]
fn next_deadline_is_the_earliest_outstanding_timer() {
    let mut s = Scheduler::new();
    let now = Instant::now();
    let task = TaskId::new("t1");
    s.set_timer(TimerId::watchdog_sweep(), Duration::from_secs(30), now);
    s.set_timer(TimerId::spawn_timeout(&task), Duration::from_secs(10), now);

    assert_eq!(s.next_deadline(), Some(now + Duration::from_secs(10)));
}

#[test]
fn empty_scheduler_has_no_deadline() {
    assert_eq!(Scheduler::new().next_deadline(), None);
    assert!(!Scheduler::new().has_timers());
}
