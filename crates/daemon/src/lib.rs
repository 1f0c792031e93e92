// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon library: config/lifecycle wiring and the HTTP/push surface
//! (§4.9) over the session orchestration core. The `foremand` binary is a
//! thin wrapper over [`lifecycle::startup`] and [`http::router`].

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod error;
pub mod http;
pub mod lifecycle;

pub use error::ApiError;
pub use http::{router, AppState};
pub use lifecycle::{startup, AppSessionManager, Config, DaemonState, LifecycleError};
