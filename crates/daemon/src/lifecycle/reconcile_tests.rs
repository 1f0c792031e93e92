// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use foreman_core::{Settings, Task, TaskId};
use foreman_engine::broadcaster::Broadcaster;
use foreman_engine::session_manager::SessionManagerDeps;
use foreman_engine::templates::DefaultTemplateRenderer;
use foreman_storage::{FileTaskStore, TaskStore as _};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

fn new_manager(dir: &tempfile::TempDir) -> (AppSessionManager, Arc<FileTaskStore>) {
    let store = Arc::new(FileTaskStore::new(dir.path().join("state")));
    let deps = SessionManagerDeps {
        store: Arc::clone(&store),
        notify: foreman_adapters::notify::DesktopNotifyAdapter::new(),
        templates: Arc::new(DefaultTemplateRenderer),
        broadcaster: Arc::new(Broadcaster::default()),
        scratch_dir: dir.path().join("scratch"),
        callback_base_url: "http://127.0.0.1:4505".to_string(),
        project_name: "demo".to_string(),
    };
    let (tx, _rx) = mpsc::channel(64);
    let manager = AppSessionManager::new(
        deps,
        Arc::new(foreman_adapters::cli::AnyCliAdapter::for_kind),
        Arc::new(foreman_adapters::terminal::AnyTerminalAdapter::for_kind),
        foreman_core::UuidIdGen,
        Settings::default(),
        tx,
    );
    (manager, store)
}

#[tokio::test]
async fn reconcile_marks_in_progress_tasks_failed() {
    let dir = tempfile::tempdir().unwrap();
    let (mut manager, store) = new_manager(&dir);

    let id = TaskId::new("t1");
    let mut task = Task::new(id.clone(), PathBuf::from("/proj"), PathBuf::from("TASKS.md"), 0);
    task.status = foreman_core::TaskStatus::InProgress;
    store.put(&task).unwrap();

    let recovered = reconcile_startup(&mut manager, store.as_ref()).await;

    assert_eq!(recovered, 1);
    let after = store.get(&id).unwrap().unwrap();
    assert_eq!(after.status, foreman_core::TaskStatus::Failed);
    assert_eq!(after.failure_reason, Some(foreman_core::FailureReason::RecoveryFailed));
}

#[tokio::test]
async fn reconcile_ignores_tasks_without_a_live_session() {
    let dir = tempfile::tempdir().unwrap();
    let (mut manager, store) = new_manager(&dir);

    let id = TaskId::new("t1");
    let task = Task::new(id.clone(), PathBuf::from("/proj"), PathBuf::from("TASKS.md"), 0);
    store.put(&task).unwrap();

    let recovered = reconcile_startup(&mut manager, store.as_ref()).await;

    assert_eq!(recovered, 0);
    let after = store.get(&id).unwrap().unwrap();
    assert_eq!(after.status, foreman_core::TaskStatus::Pending);
}
