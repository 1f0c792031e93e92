// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake terminal adapter for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Liveness, SessionStyle, TerminalAdapter, TerminalError, TerminalHandle};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum TerminalCall {
    Spawn { directory: PathBuf, argv: Vec<String> },
    Send { id: String, text: String },
    SendEnter { id: String },
    IsAlive { id: String },
    Close { id: String },
    CaptureOutput { id: String, lines: u32 },
}

struct FakeWindow {
    alive: bool,
    output: String,
}

struct FakeTerminalState {
    windows: HashMap<String, FakeWindow>,
    calls: Vec<TerminalCall>,
    next_id: u64,
    spawn_error: Option<String>,
    spawn_delay: Option<Duration>,
}

#[derive(Clone)]
pub struct FakeTerminalAdapter {
    kind: TerminalKind,
    inner: Arc<Mutex<FakeTerminalState>>,
}

impl FakeTerminalAdapter {
    pub fn new(kind: TerminalKind) -> Self {
        Self {
            kind,
            inner: Arc::new(Mutex::new(FakeTerminalState {
                windows: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
                spawn_error: None,
                spawn_delay: None,
            })),
        }
    }

    pub fn calls(&self) -> Vec<TerminalCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_spawn_error(&self, message: Option<&str>) {
        self.inner.lock().spawn_error = message.map(|s| s.to_string());
    }

    /// Makes `spawn` sleep for `delay` before returning, so tests can
    /// deterministically exercise a caller's spawn-timeout path under a
    /// paused tokio clock.
    pub fn set_spawn_delay(&self, delay: Duration) {
        self.inner.lock().spawn_delay = Some(delay);
    }

    pub fn kill(&self, handle: &TerminalHandle) {
        if let Some(w) = self.inner.lock().windows.get_mut(&handle.id) {
            w.alive = false;
        }
    }

    pub fn set_output(&self, handle: &TerminalHandle, output: impl Into<String>) {
        if let Some(w) = self.inner.lock().windows.get_mut(&handle.id) {
            w.output = output.into();
        }
    }
}

#[async_trait]
impl TerminalAdapter for FakeTerminalAdapter {
    fn kind(&self) -> TerminalKind {
        self.kind
    }

    async fn spawn(
        &self,
        directory: &Path,
        argv: &[String],
    ) -> Result<TerminalHandle, TerminalError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(TerminalCall::Spawn {
                directory: directory.to_path_buf(),
                argv: argv.to_vec(),
            });
            if let Some(ref msg) = inner.spawn_error {
                return Err(TerminalError::SpawnFailed(msg.clone()));
            }
            inner.spawn_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut inner = self.inner.lock();
        let id = format!("fake-{}", inner.next_id);
        inner.next_id += 1;
        inner.windows.insert(
            id.clone(),
            FakeWindow {
                alive: true,
                output: String::new(),
            },
        );
        Ok(TerminalHandle::new(id, Some(4242)))
    }

    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError> {
        self.inner.lock().calls.push(TerminalCall::Send {
            id: handle.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        self.inner
            .lock()
            .calls
            .push(TerminalCall::SendEnter { id: handle.id.clone() });
        Ok(())
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        self.inner
            .lock()
            .calls
            .push(TerminalCall::IsAlive { id: handle.id.clone() });
        match self.inner.lock().windows.get(&handle.id) {
            Some(w) if w.alive => Liveness::Alive,
            Some(_) => Liveness::Dead,
            None => Liveness::Unknown,
        }
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        self.inner
            .lock()
            .calls
            .push(TerminalCall::Close { id: handle.id.clone() });
        if let Some(w) = self.inner.lock().windows.get_mut(&handle.id) {
            w.alive = false;
        }
        Ok(())
    }

    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError> {
        self.inner.lock().calls.push(TerminalCall::CaptureOutput {
            id: handle.id.clone(),
            lines,
        });
        self.inner
            .lock()
            .windows
            .get(&handle.id)
            .map(|w| w.output.clone())
            .ok_or_else(|| TerminalError::NotFound(handle.id.clone()))
    }

    async fn configure(
        &self,
        _handle: &TerminalHandle,
        _style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        Ok(())
    }
}
