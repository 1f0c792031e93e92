// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for talking to `foremand` (§6's HTTP surface).

use foreman_core::{Task, TaskId};
use foreman_engine::PoolSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::daemon_process::wrap_with_startup_error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,

    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("timed out waiting for the daemon to start")]
    DaemonStartTimeout,

    #[error("request to daemon failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { kind: String, message: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopAllEntry {
    pub task_id: TaskId,
    pub ok: bool,
    pub error: Option<String>,
}

/// A thin wrapper over the daemon's HTTP surface. Every method here maps
/// 1:1 to one of §6's operations.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Connect to an already-running daemon. Errors if it is unreachable —
    /// never starts one. Used by read-only commands.
    pub async fn connect() -> Result<Self, ClientError> {
        let base_url = crate::env::daemon_base_url().ok_or(ClientError::DaemonNotRunning)?;
        let client = Self::new(base_url);
        client.ping().await.map_err(|_| ClientError::DaemonNotRunning)?;
        Ok(client)
    }

    /// Connect, spawning `foremand` in the background and waiting for it to
    /// come up if it isn't already running. Used by action commands.
    pub async fn connect_or_start() -> Result<Self, ClientError> {
        if let Ok(client) = Self::connect().await {
            return Ok(client);
        }

        let base_url = crate::env::daemon_base_url().ok_or(ClientError::DaemonNotRunning)?;
        crate::daemon_process::start_daemon_background()
            .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;

        let client = Self::new(base_url);
        let deadline = std::time::Instant::now() + crate::env::timeout_connect();
        while std::time::Instant::now() < deadline {
            if client.ping().await.is_ok() {
                return Ok(client);
            }
            tokio::time::sleep(crate::env::poll_interval()).await;
        }
        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    /// The base URL this client was built against — used by `watch` to
    /// derive the WebSocket URL without a second round of env resolution.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ping(&self) -> Result<(), reqwest::Error> {
        self.http
            .get(format!("{}/sessions", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn start(&self, task_id: &str, dangerous: bool) -> Result<Task, ClientError> {
        self.post_task(task_id, "start", &serde_json::json!({ "dangerous": dangerous })).await
    }

    pub async fn stop(&self, task_id: &str) -> Result<Task, ClientError> {
        self.post_task(task_id, "stop", &serde_json::json!({})).await
    }

    pub async fn pause(&self, task_id: &str) -> Result<Task, ClientError> {
        self.post_task(task_id, "pause", &serde_json::json!({})).await
    }

    pub async fn restart(&self, task_id: &str, reason: &str) -> Result<Task, ClientError> {
        self.post_task(task_id, "restart", &serde_json::json!({ "reason": reason })).await
    }

    pub async fn stop_all(&self) -> Result<Vec<StopAllEntry>, ClientError> {
        let url = format!("{}/tasks/stop_all", self.base_url);
        let response = self.http.post(url).send().await?;
        Ok(response.json().await?)
    }

    pub async fn sessions(&self) -> Result<PoolSnapshot, ClientError> {
        let url = format!("{}/sessions", self.base_url);
        let response = self.http.get(url).send().await?;
        Ok(response.json().await?)
    }

    async fn post_task(
        &self,
        task_id: &str,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<Task, ClientError> {
        let url = format!("{}/tasks/{task_id}/{action}", self.base_url);
        let response = self.http.post(url).json(body).send().await?;
        if response.status().is_success() {
            Ok(response.json::<Task>().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
            message: String,
        }
        match response.json::<ErrorBody>().await {
            Ok(body) => ClientError::Api {
                kind: body.error,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                kind: "unknown".to_string(),
                message: "the daemon returned an error with no readable body".to_string(),
            },
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
