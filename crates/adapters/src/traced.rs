// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability.
//!
//! `CliAdapter` has no side effects to trace — its methods are pure string
//! inspection — so only the terminal adapter gets a tracing wrapper.

use crate::terminal::{Liveness, SessionStyle, TerminalAdapter, TerminalError, TerminalHandle};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any TerminalAdapter
#[derive(Clone)]
pub struct TracedTerminal<T> {
    inner: T,
}

impl<T> TracedTerminal<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TerminalAdapter> TerminalAdapter for TracedTerminal<T> {
    fn kind(&self) -> TerminalKind {
        self.inner.kind()
    }

    async fn spawn(
        &self,
        directory: &Path,
        argv: &[String],
    ) -> Result<TerminalHandle, TerminalError> {
        async {
            tracing::info!(argv_len = argv.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(directory, argv).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(handle) => tracing::info!(id = handle.id.as_str(), elapsed_ms, "window created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("terminal.spawn", directory = %directory.display()))
        .await
    }

    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError> {
        tracing::info_span!("terminal.send", id = %handle.id)
            .in_scope(|| tracing::debug!(text_len = text.len(), "sending"));
        let result = self.inner.send(handle, text).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "send failed");
        }
        result
    }

    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let result = self.inner.send_enter(handle).await;
        if let Err(ref e) = result {
            tracing::error!(id = %handle.id, error = %e, "send_enter failed");
        }
        result
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        let result = self.inner.is_alive(handle).await;
        tracing::trace!(id = %handle.id, ?result, "checked");
        result
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        let result = self.inner.close(handle).await;
        tracing::info_span!("terminal.close", id = %handle.id).in_scope(|| match &result {
            Ok(()) => tracing::info!("closed"),
            Err(e) => tracing::warn!(error = %e, "close failed (may be expected)"),
        });
        result
    }

    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError> {
        let result = self.inner.capture_output(handle, lines).await;
        tracing::info_span!("terminal.capture", id = %handle.id, lines).in_scope(|| {
            tracing::debug!(
                captured_len = result.as_ref().map(|s| s.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn configure(
        &self,
        handle: &TerminalHandle,
        style: &SessionStyle,
    ) -> Result<(), TerminalError> {
        self.inner.configure(handle, style).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
