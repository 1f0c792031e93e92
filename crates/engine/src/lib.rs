// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Session orchestration core: the components that supervise long-running
//! interactive CLI sessions against a project's checkbox-tracked Markdown
//! document — Context Manager, Watchdog, Session Manager, Status
//! Broadcaster, the template renderer, and the checkbox inspector.

pub mod broadcaster;
pub mod checkbox;
pub mod context;
pub mod env;
pub mod error;
pub mod monitor;
pub mod scheduler;
pub mod session_manager;
pub mod templates;
pub mod watchdog;

pub use broadcaster::{Broadcaster, PoolSnapshot, SessionSnapshot};
pub use context::ContextManager;
pub use error::SessionManagerError;
pub use monitor::{spawn_monitor, MonitorHandle};
pub use scheduler::Scheduler;
pub use session_manager::{CliFactory, SessionManager, SessionManagerDeps, TerminalFactory};
pub use templates::{DefaultTemplateRenderer, TemplateKind, TemplateRenderer};
pub use watchdog::{handle_idle_lockup, handle_process_died, spawn_watchdog, sweep, WatchdogHandle};
