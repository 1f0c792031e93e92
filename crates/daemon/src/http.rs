// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP/push surface (§4.9): a thin translation shim over the Session
//! Manager. No admission control, state validation, or retries happen
//! here — every operation is a direct call into `AppSessionManager`, with
//! [`crate::error::ApiError`] turning its `Result` into a status code.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use foreman_core::{CallbackStatus, TaskId};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::lifecycle::AppSessionManager;
use foreman_engine::{Broadcaster, PoolSnapshot};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Mutex<AppSessionManager>>,
    pub broadcaster: Arc<Broadcaster>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tasks/:id/start", post(start))
        .route("/tasks/:id/stop", post(stop))
        .route("/tasks/:id/pause", post(pause))
        .route("/tasks/:id/restart", post(restart))
        .route("/tasks/stop_all", post(stop_all))
        .route("/tasks/:id/notify_status", post(notify_status))
        .route("/sessions", get(list_sessions))
        .route("/subscribe", get(subscribe))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn now_epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Deserialize, Default)]
struct StartBody {
    #[serde(default)]
    dangerous: bool,
}

async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StartBody>,
) -> Result<impl IntoResponse, ApiError> {
    let dangerous = body.dangerous;
    let task_id = TaskId::new(id);
    let mut manager = state.manager.lock().await;
    manager.start(&task_id, now_epoch_ms(), dangerous).await?;
    Ok(Json(manager.task(&task_id)?))
}

async fn stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id = TaskId::new(id);
    let mut manager = state.manager.lock().await;
    manager.stop(&task_id).await?;
    Ok(Json(manager.task(&task_id)?))
}

async fn pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id = TaskId::new(id);
    let mut manager = state.manager.lock().await;
    manager.pause(&task_id).await?;
    Ok(Json(manager.task(&task_id)?))
}

#[derive(Debug, Deserialize, Default)]
struct RestartBody {
    #[serde(default)]
    reason: String,
}

async fn restart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RestartBody>,
) -> Result<impl IntoResponse, ApiError> {
    let reason = body.reason;
    let task_id = TaskId::new(id);
    let mut manager = state.manager.lock().await;
    manager.restart(&task_id, now_epoch_ms(), &reason).await?;
    Ok(Json(manager.task(&task_id)?))
}

#[derive(Debug, Serialize, Deserialize)]
struct StopAllEntry {
    task_id: TaskId,
    ok: bool,
    error: Option<String>,
}

async fn stop_all(State(state): State<AppState>) -> impl IntoResponse {
    let mut manager = state.manager.lock().await;
    let results = manager.stop_all().await;
    let entries: Vec<StopAllEntry> = results
        .into_iter()
        .map(|(task_id, result)| StopAllEntry {
            task_id,
            ok: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        })
        .collect();
    Json(entries)
}

/// §6 CLI callback payload.
#[derive(Debug, Deserialize)]
struct NotifyStatusBody {
    status: CallbackStatus,
    #[serde(default)]
    context_usage_percent: Option<u8>,
    #[serde(default)]
    message: Option<String>,
}

async fn notify_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NotifyStatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id = TaskId::new(id);
    let mut manager = state.manager.lock().await;
    manager
        .record_task_callback(
            &task_id,
            body.status,
            body.context_usage_percent,
            body.message,
            now_epoch_ms(),
        )
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn list_sessions(State(state): State<AppState>) -> Json<PoolSnapshot> {
    let manager = state.manager.lock().await;
    Json(manager.snapshot())
}

async fn subscribe(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_snapshots(socket, state.broadcaster))
}

async fn stream_snapshots(mut socket: WebSocket, broadcaster: Arc<Broadcaster>) {
    let mut rx = broadcaster.subscribe();
    loop {
        match rx.recv().await {
            Ok(snapshot) => match serde_json::to_string(&snapshot) {
                Ok(text) => {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize pool snapshot");
                }
            },
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "subscriber lagged, dropping oldest snapshots");
                continue;
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
