// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use foreman_core::{CliKind, TaskId, TerminalKind};

fn session_at(started_at_epoch_ms: u64) -> Session {
    Session::new(
        SessionId::new("s1"),
        TaskId::new("t1"),
        CliKind::Claude,
        TerminalKind::ITerm,
        started_at_epoch_ms,
    )
}

#[test]
fn should_restart_is_false_with_no_observations_yet() {
    let session = session_at(0);
    let settings = Settings::default();
    assert!(!ContextManager::should_restart(&session, &settings, 1_000_000));
}

#[test]
fn should_restart_is_false_above_threshold() {
    let mut session = session_at(0);
    session.observe_context_percent(50);
    let settings = Settings::default();
    assert!(!ContextManager::should_restart(&session, &settings, 1_000_000));
}

#[test]
fn should_restart_is_false_before_minimum_run_elapses() {
    let mut session = session_at(0);
    session.observe_context_percent(10);
    let settings = Settings::default(); // minimum_run = 60s
    assert!(!ContextManager::should_restart(&session, &settings, 30_000));
}

#[test]
fn should_restart_is_true_at_or_below_threshold_after_minimum_run() {
    let mut session = session_at(0);
    session.observe_context_percent(15);
    let settings = Settings::default(); // threshold = 15, minimum_run = 60s
    assert!(ContextManager::should_restart(&session, &settings, 60_000));
}

#[test]
fn trend_samples_cap_at_the_window_size() {
    let mut mgr = ContextManager::new();
    let id = SessionId::new("s1");
    for p in 0..15u8 {
        mgr.record_sample(id.clone(), 100 - p);
    }
    assert_eq!(mgr.trend(&id).len(), TREND_WINDOW);
    // oldest samples (100, 99, ...) should have been evicted
    assert_eq!(mgr.trend(&id)[0], 95);
}

#[test]
fn forget_clears_trend_history() {
    let mut mgr = ContextManager::new();
    let id = SessionId::new("s1");
    mgr.record_sample(id.clone(), 50);
    mgr.forget(&id);
    assert!(mgr.trend(&id).is_empty());
}
