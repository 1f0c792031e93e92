// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn parse_startup_error_finds_error_after_marker() {
    let log = "--- foremand: starting (pid: 42) ---\n\
2026-01-01T00:00:00Z ERROR: bind failed\n\
2026-01-01T00:00:01Z INFO: shutting down\n";
    let err = parse_startup_error(log).unwrap();
    assert_eq!(err, "bind failed");
}

#[test]
fn parse_startup_error_ignores_earlier_startups() {
    let log = "--- foremand: starting (pid: 1) ---\n\
2026-01-01T00:00:00Z ERROR: old failure\n\
--- foremand: starting (pid: 2) ---\n\
2026-01-01T00:00:01Z INFO: ok\n";
    assert_eq!(parse_startup_error(log), None);
}

#[test]
fn parse_startup_error_none_without_marker() {
    assert_eq!(parse_startup_error("INFO: hello\n"), None);
}

#[test]
fn parse_startup_error_falls_back_to_whole_line_without_colon() {
    let log = "--- foremand: starting (pid: 1) ---\nFailed to start\n";
    let err = parse_startup_error(log).unwrap();
    assert_eq!(err, "Failed to start");
}

#[test]
#[serial]
fn read_daemon_pid_reads_lock_file_without_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("FOREMAN_STATE_DIR", dir.path());
    std::fs::write(dir.path().join("foremand.lock"), "12345").unwrap();

    assert_eq!(read_daemon_pid().unwrap(), Some(12345));

    std::env::remove_var("FOREMAN_STATE_DIR");
}

#[test]
#[serial]
fn read_daemon_pid_none_when_no_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("FOREMAN_STATE_DIR", dir.path());

    assert_eq!(read_daemon_pid().unwrap(), None);

    std::env::remove_var("FOREMAN_STATE_DIR");
}

#[test]
#[serial]
fn wrap_with_startup_error_prefers_log_detail() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("FOREMAN_STATE_DIR", dir.path());
    std::fs::write(
        dir.path().join("foremand.log"),
        "--- foremand: starting (pid: 7) ---\nERROR: port in use\n",
    )
    .unwrap();

    let wrapped = wrap_with_startup_error(ClientError::DaemonStartTimeout);
    match wrapped {
        ClientError::DaemonStartFailed(msg) => assert_eq!(msg, "port in use"),
        other => panic!("expected DaemonStartFailed, got {other:?}"),
    }

    std::env::remove_var("FOREMAN_STATE_DIR");
}

#[test]
#[serial]
fn wrap_with_startup_error_passes_through_without_log() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("FOREMAN_STATE_DIR", dir.path());

    let wrapped = wrap_with_startup_error(ClientError::DaemonStartTimeout);
    assert!(matches!(wrapped, ClientError::DaemonStartTimeout));

    std::env::remove_var("FOREMAN_STATE_DIR");
}

#[test]
fn process_exists_false_for_unlikely_pid() {
    assert!(!process_exists(u32::MAX));
}
