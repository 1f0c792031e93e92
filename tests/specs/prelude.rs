//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing the `foreman` CLI and `foremand`
//! daemon as black boxes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timeouts for fast tests.
//
// IMPORTANT:
//   Do NOT change these.
//   File a performance bug instead.
const FOREMAN_TIMEOUT_CONNECT_MS: &str = "2000";
const FOREMAN_TIMEOUT_EXIT_MS: &str = "500";
const FOREMAN_CONNECT_POLL_MS: &str = "5";

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn foreman_binary() -> PathBuf {
    binary_path("foreman")
}

pub fn foremand_binary() -> PathBuf {
    binary_path("foremand")
}

/// Returns a Command configured to run the `foreman` binary.
pub fn foreman_cmd() -> Command {
    Command::new(foreman_binary())
}

/// Create a CLI builder for `foreman` commands.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions.
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: vec![
                (
                    "FOREMAN_DAEMON_BINARY".into(),
                    foremand_binary().to_string_lossy().into(),
                ),
                (
                    "FOREMAN_TIMEOUT_CONNECT_MS".into(),
                    FOREMAN_TIMEOUT_CONNECT_MS.into(),
                ),
                (
                    "FOREMAN_TIMEOUT_EXIT_MS".into(),
                    FOREMAN_TIMEOUT_EXIT_MS.into(),
                ),
                (
                    "FOREMAN_CONNECT_POLL_MS".into(),
                    FOREMAN_CONNECT_POLL_MS.into(),
                ),
            ],
        }
    }

    /// Add CLI arguments.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set an environment variable (e.g. `FOREMAN_HTTP_ADDR`, `FOREMAN_STATE_DIR`).
    pub fn env(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.envs
            .push((key.to_string(), value.as_ref().to_string()));
        self
    }

    /// Build the command without running it.
    pub fn command(self) -> Command {
        let mut cmd = foreman_cmd();
        cmd.args(&self.args);
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run and expect success (exit code 0).
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code).
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// An isolated daemon instance: its own HTTP port and state directory, torn
/// down (daemon stopped) when dropped.
pub struct Daemon {
    addr: String,
    state_dir: tempfile::TempDir,
}

impl Daemon {
    /// Claim an isolated loopback port and state dir, without starting the
    /// daemon yet — `foreman`'s `connect_or_start` path does that lazily.
    pub fn isolated(port: u16) -> Self {
        Self {
            addr: format!("127.0.0.1:{port}"),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn cli(&self) -> CliBuilder {
        cli()
            .env("FOREMAN_HTTP_ADDR", &self.addr)
            .env(
                "FOREMAN_STATE_DIR",
                self.state_dir.path().to_string_lossy().as_ref(),
            )
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let mut cmd = self.cli().args(&["daemon", "stop"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}
