//! The daemon starts on demand, reports itself reachable, and stops cleanly.

use crate::prelude::*;

#[test]
fn status_reports_not_running_before_start() {
    let daemon = Daemon::isolated(14601);
    daemon
        .cli()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn start_then_status_reports_running() {
    let daemon = Daemon::isolated(14602);
    daemon.cli().args(&["daemon", "start"]).passes();

    let running = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon
            .cli()
            .args(&["daemon", "status"])
            .command()
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("running"))
            .unwrap_or(false)
    });
    assert!(running, "daemon did not report running after start");

    daemon
        .cli()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running");
}

#[test]
fn stop_is_idempotent_when_already_stopped() {
    let daemon = Daemon::isolated(14603);
    daemon
        .cli()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn sessions_reports_empty_pool_on_fresh_daemon() {
    let daemon = Daemon::isolated(14604);
    daemon.cli().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        daemon
            .cli()
            .args(&["daemon", "status"])
            .command()
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("running"))
            .unwrap_or(false)
    });

    daemon
        .cli()
        .args(&["sessions"])
        .passes()
        .stdout_has("0 of");
}
