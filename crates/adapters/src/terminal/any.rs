// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatches to one of the concrete terminal adapters by `TerminalKind`, so
//! the Session Manager can resolve "the platform or operator's preference"
//! (§4.6 step 2) to a single concrete, `Clone`-able type.

use super::{
    ItermAdapter, KittyAdapter, Liveness, SessionStyle, TerminalAdapter, TerminalError,
    TerminalHandle, WindowsTerminalAdapter,
};
use async_trait::async_trait;
use foreman_core::TerminalKind;
use std::path::Path;

#[derive(Clone, Copy, Debug)]
pub enum AnyTerminalAdapter {
    ITerm(ItermAdapter),
    Kitty(KittyAdapter),
    WindowsTerminal(WindowsTerminalAdapter),
}

impl AnyTerminalAdapter {
    pub fn for_kind(kind: TerminalKind) -> Self {
        match kind {
            TerminalKind::ITerm => AnyTerminalAdapter::ITerm(ItermAdapter::new()),
            TerminalKind::Kitty => AnyTerminalAdapter::Kitty(KittyAdapter::new()),
            TerminalKind::WindowsTerminal => {
                AnyTerminalAdapter::WindowsTerminal(WindowsTerminalAdapter::new())
            }
        }
    }

    /// "Auto by platform" terminal selection (§4.2), absent an operator
    /// preference.
    pub fn for_platform() -> Self {
        let kind = if cfg!(target_os = "windows") {
            TerminalKind::WindowsTerminal
        } else if cfg!(target_os = "macos") {
            TerminalKind::ITerm
        } else {
            TerminalKind::Kitty
        };
        Self::for_kind(kind)
    }
}

#[async_trait]
impl TerminalAdapter for AnyTerminalAdapter {
    fn kind(&self) -> TerminalKind {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.kind(),
            AnyTerminalAdapter::Kitty(a) => a.kind(),
            AnyTerminalAdapter::WindowsTerminal(a) => a.kind(),
        }
    }

    async fn spawn(
        &self,
        directory: &Path,
        argv: &[String],
    ) -> Result<TerminalHandle, TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.spawn(directory, argv).await,
            AnyTerminalAdapter::Kitty(a) => a.spawn(directory, argv).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.spawn(directory, argv).await,
        }
    }

    async fn send(&self, handle: &TerminalHandle, text: &str) -> Result<(), TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.send(handle, text).await,
            AnyTerminalAdapter::Kitty(a) => a.send(handle, text).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.send(handle, text).await,
        }
    }

    async fn send_enter(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.send_enter(handle).await,
            AnyTerminalAdapter::Kitty(a) => a.send_enter(handle).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.send_enter(handle).await,
        }
    }

    async fn is_alive(&self, handle: &TerminalHandle) -> Liveness {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.is_alive(handle).await,
            AnyTerminalAdapter::Kitty(a) => a.is_alive(handle).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.is_alive(handle).await,
        }
    }

    async fn close(&self, handle: &TerminalHandle) -> Result<(), TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.close(handle).await,
            AnyTerminalAdapter::Kitty(a) => a.close(handle).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.close(handle).await,
        }
    }

    async fn capture_output(
        &self,
        handle: &TerminalHandle,
        lines: u32,
    ) -> Result<String, TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.capture_output(handle, lines).await,
            AnyTerminalAdapter::Kitty(a) => a.capture_output(handle, lines).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.capture_output(handle, lines).await,
        }
    }

    async fn configure(&self, handle: &TerminalHandle, style: &SessionStyle) -> Result<(), TerminalError> {
        match self {
            AnyTerminalAdapter::ITerm(a) => a.configure(handle, style).await,
            AnyTerminalAdapter::Kitty(a) => a.configure(handle, style).await,
            AnyTerminalAdapter::WindowsTerminal(a) => a.configure(handle, style).await,
        }
    }
}
