// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal adapters
//!
//! Per-emulator capability: spawn a window running a given command line in a
//! given directory, query whether the window/process is still alive, and
//! best-effort close it.

mod any;
mod iterm;
mod kitty;
mod windows_terminal;

pub use any::AnyTerminalAdapter;
pub use iterm::ItermAdapter;
pub use kitty::KittyAdapter;
pub use windows_terminal::WindowsTerminalAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTerminalAdapter, TerminalCall};

use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;
use thiserror::Error;

/// Errors from terminal operations
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("window not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("{0} does not support this operation: {1}")]
    Unsupported(&'static str, String),
}

/// Three-valued liveness. `Unknown` is the only honest answer when an
/// emulator exposes no introspection facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
    Unknown,
}

/// Opaque handle to a spawned terminal window/pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalHandle {
    /// Emulator-specific identifier (tab/window id, or a composite string).
    pub id: String,
    /// OS process id of the spawned child, when known.
    pub pid: Option<u32>,
}

impl TerminalHandle {
    pub fn new(id: impl Into<String>, pid: Option<u32>) -> Self {
        Self { id: id.into(), pid }
    }
}

/// Cosmetic session labeling applied by `configure`. Optional; emulators with
/// no such facility default to a no-op.
#[derive(Debug, Clone, Default)]
pub struct SessionStyle {
    pub title: Option<String>,
    pub color: Option<String>,
}

/// Adapter for a terminal emulator capable of hosting a long-running CLI
/// session in its own window or tab.
#[async_trait]
pub trait TerminalAdapter: Clone + Send + Sync + 'static {
    /// Which emulator this adapter drives.
    fn kind(&self) -> TerminalKind;

    /// Spawn a new window/tab running `argv` inside `directory`.
    async fn spawn(
        &self,
        directory: &Path,
        argv: &[String],
    ) -> Result<TerminalHandle, TerminalError>;

    /// Send text to the session (not necessarily submitted; see `send_enter`).
    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError>;

    /// Submit the current input line.
    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError>;

    /// Three-valued liveness check.
    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness;

    /// Best-effort close; idempotent.
    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError>;

    /// Capture the last `lines` of visible output.
    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError>;

    /// Apply cosmetic styling (title, status color). Default: no-op.
    async fn configure(
        &self,
        _handle: &TerminalHandle,
        _style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
