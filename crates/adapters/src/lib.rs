// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: CLI assistants, terminal emulators, and
//! desktop notifications.

pub mod cli;
mod env;
pub mod notify;
pub mod subprocess;
pub mod terminal;
pub mod traced;

pub use cli::{CliAdapter, ClaudeCliAdapter, CodexCliAdapter, GeminiCliAdapter, ResumeContext};
pub use notify::{DesktopNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter};
pub use terminal::{
    ItermAdapter, KittyAdapter, Liveness, SessionStyle, TerminalAdapter, TerminalError,
    TerminalHandle, WindowsTerminalAdapter,
};
pub use traced::TracedTerminal;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use cli::{CliCall, FakeCliAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use terminal::{FakeTerminalAdapter, TerminalCall};
