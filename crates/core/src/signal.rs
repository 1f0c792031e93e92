// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output-derived signal types for a running CLI session.
//!
//! A `SessionSignal` is what the watcher layer (CLI Adapter + Watchdog)
//! observes by tailing a session's output or its structured log; it is the
//! input to the Task State Machine's transition decisions, not a state the
//! state machine owns itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a CLI session as detected from monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSignal {
    /// The CLI is actively working (processing or running tools).
    Working,
    /// The CLI reached its idle prompt, waiting for input.
    WaitingForInput,
    /// The CLI reported or exhibited a failure.
    Failed(SessionFailure),
    /// The CLI process exited.
    Exited { exit_code: Option<i32> },
    /// The session is gone — the terminal adapter can no longer find it.
    Gone,
}

/// Categorized failure reasons for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionFailure {
    /// Invalid API key or authentication failure.
    Unauthorized,
    /// Exceeded quota or billing issue.
    OutOfCredits,
    /// Network connectivity issue.
    NoInternet,
    /// Rate limited by the CLI's backend.
    RateLimited,
    /// The terminal window was closed by the user (mapped to ProcessDied, not
    /// a distinct outcome — see the watchdog's liveness handling).
    WindowClosed,
    /// Other error with message.
    Other(String),
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFailure::Unauthorized => write!(f, "unauthorized"),
            SessionFailure::OutOfCredits => write!(f, "out of credits"),
            SessionFailure::NoInternet => write!(f, "no internet connection"),
            SessionFailure::RateLimited => write!(f, "rate limited"),
            SessionFailure::WindowClosed => write!(f, "window closed"),
            SessionFailure::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for SessionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionSignal::Working => write!(f, "working"),
            SessionSignal::WaitingForInput => write!(f, "waiting for input"),
            SessionSignal::Failed(reason) => write!(f, "failed: {}", reason),
            SessionSignal::Exited {
                exit_code: Some(code),
            } => write!(f, "exited with code {}", code),
            SessionSignal::Exited { exit_code: None } => write!(f, "exited"),
            SessionSignal::Gone => write!(f, "gone"),
        }
    }
}

/// Categorizes a free-form error message the way the watcher's `detect_error`
/// step does, matching on a handful of recognizable substrings.
pub fn classify_failure_message(message: &str) -> SessionFailure {
    let lower = message.to_lowercase();
    if lower.contains("unauthorized") || lower.contains("invalid api key") {
        SessionFailure::Unauthorized
    } else if lower.contains("credit") || lower.contains("quota") || lower.contains("billing") {
        SessionFailure::OutOfCredits
    } else if lower.contains("network") || lower.contains("connection") || lower.contains("offline")
    {
        SessionFailure::NoInternet
    } else if lower.contains("rate limit") || lower.contains("too many requests") {
        SessionFailure::RateLimited
    } else {
        SessionFailure::Other(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_substrings() {
        assert_eq!(
            classify_failure_message("Invalid API key provided"),
            SessionFailure::Unauthorized
        );
        assert_eq!(
            classify_failure_message("You have exceeded your quota"),
            SessionFailure::OutOfCredits
        );
        assert_eq!(
            classify_failure_message("network connection lost"),
            SessionFailure::NoInternet
        );
        assert_eq!(
            classify_failure_message("429 rate limit exceeded"),
            SessionFailure::RateLimited
        );
    }

    #[test]
    fn falls_back_to_other() {
        assert_eq!(
            classify_failure_message("something weird happened"),
            SessionFailure::Other("something weird happened".to_string())
        );
    }

    #[test]
    fn display_matches_expected_text() {
        assert_eq!(SessionSignal::Working.to_string(), "working");
        assert_eq!(
            SessionSignal::Exited { exit_code: Some(1) }.to_string(),
            "exited with code 1"
        );
    }
}
