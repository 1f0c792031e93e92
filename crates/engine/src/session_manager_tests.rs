// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::broadcaster::Broadcaster;
use crate::templates::DefaultTemplateRenderer;
use foreman_adapters::cli::FakeCliAdapter;
use foreman_adapters::notify::FakeNotifyAdapter;
use foreman_adapters::terminal::FakeTerminalAdapter;
use foreman_core::id::SequentialIdGen;
use foreman_storage::FileTaskStore;
use std::path::PathBuf;

type TestManager = SessionManager<FakeCliAdapter, FakeTerminalAdapter, FileTaskStore, FakeNotifyAdapter, SequentialIdGen>;

fn new_manager(settings: Settings) -> (TestManager, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTaskStore::new(dir.path().join("state")));
    let deps = SessionManagerDeps {
        store,
        notify: FakeNotifyAdapter::new(),
        templates: Arc::new(DefaultTemplateRenderer),
        broadcaster: Arc::new(Broadcaster::default()),
        scratch_dir: dir.path().join("scratch"),
        callback_base_url: "http://127.0.0.1:9000".to_string(),
        project_name: "demo".to_string(),
    };
    let cli_factory: CliFactory<FakeCliAdapter> =
        Arc::new(|kind| FakeCliAdapter::new(kind));
    let terminal_factory: TerminalFactory<FakeTerminalAdapter> =
        Arc::new(|kind| FakeTerminalAdapter::new(kind));
    let (tx, _rx) = mpsc::channel(64);
    let manager = SessionManager::new(
        deps,
        cli_factory,
        terminal_factory,
        SequentialIdGen::new("test"),
        settings,
        tx,
    );
    (manager, dir)
}

fn seed_task(manager: &TestManager, project_dir: &PathBuf) -> TaskId {
    let id = TaskId::new("t1");
    let task = Task::new(id.clone(), project_dir.clone(), PathBuf::from("TASKS.md"), 0);
    manager.deps.store.put(&task).unwrap();
    id
}

#[tokio::test]
async fn start_spawns_and_transitions_to_in_progress() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));

    mgr.start(&task_id, 1_000, false).await.unwrap();

    assert_eq!(mgr.active_count(), 1);
    assert!(mgr.has_live_session(&task_id));
    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn start_on_non_pending_task_is_invalid_state() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 1_000, false).await.unwrap();

    let err = mgr.start(&task_id, 2_000, false).await.unwrap_err();
    assert!(matches!(err, SessionManagerError::InvalidState { .. }));
}

#[tokio::test]
async fn start_beyond_capacity_queues_the_task() {
    let mut settings = Settings::default();
    settings.max_concurrent_sessions = 1;
    let (mut mgr, dir) = new_manager(settings);

    let t1 = seed_task(&mgr, &dir.path().join("proj1"));
    mgr.start(&t1, 1_000, false).await.unwrap();

    let t2_id = TaskId::new("t2");
    let t2 = Task::new(t2_id.clone(), dir.path().join("proj2"), PathBuf::from("TASKS.md"), 0);
    mgr.deps.store.put(&t2).unwrap();

    let err = mgr.start(&t2_id, 1_000, false).await.unwrap_err();
    assert!(matches!(err, SessionManagerError::Queued { .. }));
    assert_eq!(mgr.waiting_queue().len(), 1);
}

#[tokio::test]
async fn stop_decrements_active_count_and_frees_a_slot_for_the_queue() {
    let mut settings = Settings::default();
    settings.max_concurrent_sessions = 1;
    let (mut mgr, dir) = new_manager(settings);

    let t1 = seed_task(&mgr, &dir.path().join("proj1"));
    mgr.start(&t1, 1_000, false).await.unwrap();

    let t2_id = TaskId::new("t2");
    let t2 = Task::new(t2_id.clone(), dir.path().join("proj2"), PathBuf::from("TASKS.md"), 0);
    mgr.deps.store.put(&t2).unwrap();
    mgr.start(&t2_id, 1_000, false).await.unwrap_err();

    mgr.stop(&t1).await.unwrap();
    assert_eq!(mgr.active_count(), 0);

    mgr.advance_waiting_queue(2_000).await;
    assert_eq!(mgr.active_count(), 1);
    assert!(mgr.has_live_session(&t2_id));
}

#[tokio::test]
async fn spawn_failure_leaves_the_task_pending_and_the_slot_free() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));

    // Force every newly-created FakeTerminalAdapter to fail its spawn: since
    // the factory builds a fresh fake per call, configure failure via a
    // wrapper factory that sets the error immediately after construction.
    let cli_factory: CliFactory<FakeCliAdapter> = Arc::new(|kind| FakeCliAdapter::new(kind));
    let terminal_factory: TerminalFactory<FakeTerminalAdapter> = Arc::new(|kind| {
        let adapter = FakeTerminalAdapter::new(kind);
        adapter.set_spawn_error(Some("emulator not installed"));
        adapter
    });
    mgr.cli_factory = cli_factory;
    mgr.terminal_factory = terminal_factory;

    let err = mgr.start(&task_id, 1_000, false).await.unwrap_err();
    assert!(matches!(err, SessionManagerError::SpawnFailed { .. }));
    assert_eq!(mgr.active_count(), 0);
    assert!(!mgr.has_live_session(&task_id));
    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn restart_keeps_the_slot_and_uses_the_resume_prompt() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 1_000, false).await.unwrap();
    assert_eq!(mgr.active_count(), 1);

    mgr.restart(&task_id, 5_000, "context low").await.unwrap();

    assert_eq!(mgr.active_count(), 1, "restart must not consume an extra slot");
    assert!(mgr.has_live_session(&task_id));
    let cli = mgr.cli_for(&task_id).unwrap();
    assert!(cli
        .calls()
        .iter()
        .any(|c| matches!(c, foreman_adapters::cli::CliCall::ResumePrompt)));
}

#[tokio::test]
async fn record_context_observation_feeds_should_restart() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.record_context_observation(&task_id, 10);
    assert!(mgr.should_restart(&task_id, 60_000));
    assert!(!mgr.should_restart(&task_id, 10_000));
}

#[tokio::test]
async fn finish_task_completed_clears_failure_and_persists() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.finish_task(&task_id, TaskStatus::Completed, 2_000, None).await.unwrap();
    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.completed_at_epoch_ms, Some(2_000));
}

#[tokio::test]
async fn finish_task_failed_sends_a_notification() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.finish_task(
        &task_id,
        TaskStatus::Failed,
        2_000,
        Some(FailureReason::ProcessDied),
    )
    .await
    .unwrap();

    assert_eq!(mgr.deps.notify.calls().len(), 1);
}

#[tokio::test]
async fn callback_completed_stops_the_session_and_finishes_the_task() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.record_task_callback(&task_id, CallbackStatus::Completed, Some(40), None, 5_000)
        .await
        .unwrap();

    assert!(!mgr.has_live_session(&task_id));
    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn callback_failed_records_the_reported_message() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.record_task_callback(
        &task_id,
        CallbackStatus::Failed,
        None,
        Some("out of disk space".to_string()),
        5_000,
    )
    .await
    .unwrap();

    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Failed);
    assert_eq!(
        task.failure_reason,
        Some(FailureReason::ReportedFailure("out of disk space".to_string()))
    );
}

#[tokio::test]
async fn callback_cannot_regress_a_completed_task() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();
    mgr.finish_task(&task_id, TaskStatus::Completed, 1_000, None).await.unwrap();

    mgr.record_task_callback(&task_id, CallbackStatus::InProgress, Some(90), None, 2_000)
        .await
        .unwrap();

    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn callback_completed_with_review_enabled_spawns_a_review_session() {
    let mut settings = Settings::default();
    settings.review_enabled = true;
    let (mut mgr, dir) = new_manager(settings);
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.record_task_callback(&task_id, CallbackStatus::Completed, Some(40), None, 5_000)
        .await
        .unwrap();

    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::InReviewing);
    assert!(
        mgr.has_live_session(&task_id),
        "a completed, review-enabled task must hand off to a live review session"
    );
    assert_eq!(mgr.cli_for(&task_id).unwrap().kind(), CliKind::Codex);
}

#[tokio::test]
async fn startup_dialog_is_cleared_before_the_spawn_completes() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));

    let cli_factory: CliFactory<FakeCliAdapter> = Arc::new(|kind| {
        let adapter = FakeCliAdapter::new(kind);
        adapter.set_startup_dialog(Some(foreman_adapters::cli::StartupDialog::Clearable("1")));
        adapter
    });
    mgr.cli_factory = cli_factory;

    mgr.start(&task_id, 1_000, false).await.unwrap();

    assert!(mgr.has_live_session(&task_id));
    let (terminal, _handle) = mgr.session_handle(&task_id).unwrap();
    let send_count = terminal
        .calls()
        .iter()
        .filter(|c| matches!(c, foreman_adapters::terminal::TerminalCall::Send { .. }))
        .count();
    assert!(send_count > 0, "a clearable dialog must be cleared by sending its key");
}

#[tokio::test]
async fn startup_dialog_login_required_fails_the_spawn() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));

    let cli_factory: CliFactory<FakeCliAdapter> = Arc::new(|kind| {
        let adapter = FakeCliAdapter::new(kind);
        adapter.set_startup_dialog(Some(foreman_adapters::cli::StartupDialog::LoginRequired));
        adapter
    });
    mgr.cli_factory = cli_factory;

    let err = mgr.start(&task_id, 1_000, false).await.unwrap_err();
    assert!(matches!(err, SessionManagerError::SpawnFailed { .. }));
    assert!(!mgr.has_live_session(&task_id));
    let task = mgr.deps.store.get(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn spawn_timeout_fires_when_the_terminal_never_confirms() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));

    let terminal_factory: TerminalFactory<FakeTerminalAdapter> = Arc::new(|kind| {
        let adapter = FakeTerminalAdapter::new(kind);
        adapter.set_spawn_delay(Duration::from_secs(30));
        adapter
    });
    mgr.terminal_factory = terminal_factory;

    let start = tokio::time::Instant::now();
    let result = mgr.start(&task_id, 1_000, false);
    tokio::pin!(result);
    tokio::select! {
        res = &mut result => {
            let err = res.unwrap_err();
            assert!(matches!(err, SessionManagerError::SpawnTimeout { .. }));
        }
        _ = tokio::time::sleep(Duration::from_secs(15)) => {
            panic!("spawn did not time out within the expected window");
        }
    }
    assert!(start.elapsed() < Duration::from_secs(30));
}

#[tokio::test]
async fn callback_in_progress_only_updates_context() {
    let (mut mgr, dir) = new_manager(Settings::default());
    let task_id = seed_task(&mgr, &dir.path().join("proj"));
    mgr.start(&task_id, 0, false).await.unwrap();

    mgr.record_task_callback(&task_id, CallbackStatus::InProgress, Some(42), None, 1_000)
        .await
        .unwrap();

    assert!(mgr.has_live_session(&task_id));
    assert_eq!(mgr.session_for(&task_id).unwrap().last_context_percent, Some(42));
}
