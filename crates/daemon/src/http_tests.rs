// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lifecycle::AppSessionManager;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use foreman_core::{Settings, Task, TaskId};
use foreman_engine::session_manager::SessionManagerDeps;
use foreman_engine::templates::DefaultTemplateRenderer;
use foreman_storage::{FileTaskStore, TaskStore as _};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tower::ServiceExt;

fn new_state(dir: &tempfile::TempDir) -> (AppState, std::sync::Arc<FileTaskStore>) {
    let store = std::sync::Arc::new(FileTaskStore::new(dir.path().join("state")));
    let broadcaster = std::sync::Arc::new(Broadcaster::default());
    let deps = SessionManagerDeps {
        store: std::sync::Arc::clone(&store),
        notify: foreman_adapters::notify::DesktopNotifyAdapter::new(),
        templates: std::sync::Arc::new(DefaultTemplateRenderer),
        broadcaster: std::sync::Arc::clone(&broadcaster),
        scratch_dir: dir.path().join("scratch"),
        callback_base_url: "http://127.0.0.1:4505".to_string(),
        project_name: "demo".to_string(),
    };
    let (tx, _rx) = mpsc::channel(64);
    let manager = AppSessionManager::new(
        deps,
        std::sync::Arc::new(foreman_adapters::cli::AnyCliAdapter::for_kind),
        std::sync::Arc::new(foreman_adapters::terminal::AnyTerminalAdapter::for_kind),
        foreman_core::UuidIdGen,
        Settings::default(),
        tx,
    );
    let state = AppState {
        manager: std::sync::Arc::new(Mutex::new(manager)),
        broadcaster,
    };
    (state, store)
}

fn seed_task(store: &FileTaskStore, dir: &tempfile::TempDir) -> TaskId {
    let id = TaskId::new("t1");
    let task = Task::new(id.clone(), dir.path().join("proj"), PathBuf::from("TASKS.md"), 0);
    store.put(&task).unwrap();
    id
}

#[tokio::test]
async fn stop_all_with_no_live_sessions_returns_an_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = new_state(&dir);
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tasks/stop_all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let entries: Vec<StopAllEntry> = serde_json::from_slice(&bytes).unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn list_sessions_reflects_the_pool_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = new_state(&dir);
    let app = router(state);

    let response = app
        .oneshot(Request::builder().uri("/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let snapshot: PoolSnapshot = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(snapshot.count, 0);
    assert_eq!(snapshot.max_concurrent, Settings::default().max_concurrent_sessions);
}

#[tokio::test]
async fn start_on_an_unknown_task_surfaces_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = new_state(&dir);
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tasks/missing/start")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notify_status_on_a_pending_task_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (state, store) = new_state(&dir);
    let task_id = seed_task(&store, &dir);
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/tasks/{task_id}/notify_status"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status":"completed"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
