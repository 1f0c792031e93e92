//! Error reporting for task operations against an unknown task id.

use crate::prelude::*;

fn running_daemon(port: u16) -> Daemon {
    let daemon = Daemon::isolated(port);
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
}

#[test]
fn stop_unknown_task_reports_not_found() {
    let daemon = running_daemon(14611);
    daemon
        .cli()
        .args(&["stop", "no-such-task"])
        .fails()
        .stderr_has("no-such-task");
}

#[test]
fn pause_unknown_task_reports_not_found() {
    let daemon = running_daemon(14612);
    daemon
        .cli()
        .args(&["pause", "no-such-task"])
        .fails()
        .stderr_has("no-such-task");
}

#[test]
fn stop_without_a_reachable_daemon_does_not_auto_start_one() {
    // `stop` uses Client::connect(), never connect_or_start() — a stray
    // invocation against a dead daemon should fail fast, not spawn one.
    let daemon = Daemon::isolated(14613);
    daemon
        .cli()
        .args(&["stop", "some-task"])
        .fails()
        .stderr_has("not running");
}

#[test]
fn stop_all_on_empty_pool_reports_no_active_tasks() {
    let daemon = running_daemon(14614);
    daemon
        .cli()
        .args(&["stop-all"])
        .passes()
        .stdout_has("No active tasks");
}
