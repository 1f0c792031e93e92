// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn send_is_unsupported() {
    let adapter = WindowsTerminalAdapter::new();
    let handle = TerminalHandle::new("marker", Some(123));
    let err = adapter.send(&handle, "hi").await.unwrap_err();
    assert!(matches!(err, TerminalError::Unsupported(..)));
}

#[tokio::test]
async fn capture_output_is_unsupported() {
    let adapter = WindowsTerminalAdapter::new();
    let handle = TerminalHandle::new("marker", Some(123));
    let err = adapter.capture_output(&handle, 10).await.unwrap_err();
    assert!(matches!(err, TerminalError::Unsupported(..)));
}

#[tokio::test]
async fn is_alive_is_unknown_without_a_pid() {
    let adapter = WindowsTerminalAdapter::new();
    let handle = TerminalHandle::new("marker", None);
    assert_eq!(adapter.is_alive(&handle).await, Liveness::Unknown);
}

#[tokio::test]
async fn wait_for_marker_pid_returns_none_when_file_never_appears() {
    let marker = std::env::temp_dir().join("foreman-wt-test-missing.pid");
    assert_eq!(wait_for_marker_pid(&marker).await, None);
}
