// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::net::SocketAddr;

/// HTTP listen address, default `127.0.0.1:4505`.
pub fn http_addr() -> Result<SocketAddr, crate::lifecycle::LifecycleError> {
    match std::env::var("FOREMAN_HTTP_ADDR") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| crate::lifecycle::LifecycleError::InvalidAddr(raw)),
        Err(_) => Ok(([127, 0, 0, 1], 4505).into()),
    }
}

/// Base URL the daemon tells spawned CLIs to call back to, default derived
/// from [`http_addr`]. Overridable for operators running behind a proxy.
pub fn callback_base_url(bound: SocketAddr) -> String {
    std::env::var("FOREMAN_CALLBACK_BASE_URL").unwrap_or_else(|_| format!("http://{bound}"))
}

/// Project name injected into prompt templates, default `"default"`.
pub fn project_name() -> String {
    std::env::var("FOREMAN_PROJECT_NAME").unwrap_or_else(|_| "default".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
