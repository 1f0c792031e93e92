// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: config resolution, the exclusive startup
//! lock, wiring the Session Manager's production dependencies, and
//! shutdown.

pub mod reconcile;

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use foreman_adapters::cli::AnyCliAdapter;
use foreman_adapters::notify::DesktopNotifyAdapter;
use foreman_adapters::terminal::AnyTerminalAdapter;
use foreman_core::{Clock, SystemClock, UuidIdGen};
use foreman_engine::{
    Broadcaster, DefaultTemplateRenderer, SessionManager, SessionManagerDeps, WatchdogHandle,
};
use foreman_storage::{FileSettingsStore, FileTaskStore, SettingsStore};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

/// The daemon's concrete instantiation of the generic `SessionManager`, with
/// every production adapter resolved.
pub type AppSessionManager =
    SessionManager<AnyCliAdapter, AnyTerminalAdapter, FileTaskStore, DesktopNotifyAdapter, UuidIdGen>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine a state directory")]
    NoStateDir,

    #[error("invalid HTTP listen address: {0}")]
    InvalidAddr(String),

    #[error("another foremand is already running (lock held at {path})")]
    LockFailed { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] foreman_storage::StorageError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub http_addr: SocketAddr,
}

impl Config {
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = foreman_engine::env::state_dir();
        if state_dir.as_os_str().is_empty() {
            return Err(LifecycleError::NoStateDir);
        }
        let http_addr = crate::env::http_addr()?;
        Ok(Self {
            lock_path: state_dir.join("foremand.lock"),
            version_path: state_dir.join("foremand.version"),
            log_path: state_dir.join("foremand.log"),
            scratch_dir: state_dir.join("scratch"),
            state_dir,
            http_addr,
        })
    }
}

/// Everything the daemon binary needs to drive the HTTP server and hand off
/// to shutdown: the live manager (behind a single mutex, per §5's
/// single-writer invariant), the broadcaster the HTTP `subscribe` handler
/// reads from, and the watchdog's stop handle.
pub struct DaemonState {
    pub config: Config,
    lock_file: File,
    pub manager: Arc<Mutex<AppSessionManager>>,
    pub broadcaster: Arc<Broadcaster>,
    pub watchdog: WatchdogHandle,
}

impl DaemonState {
    /// Releases the watchdog and the startup lock. The lock file itself is
    /// also released on drop, but doing it explicitly here lets the binary
    /// log the shutdown step and control ordering relative to the HTTP
    /// server's own drain.
    pub fn shutdown(self) {
        self.watchdog.stop();
        let _ = self.lock_file.unlock();
        tracing::info!("daemon state torn down");
    }
}

/// Acquires the startup lock, loads settings and tasks, constructs the
/// production `SessionManager`, runs the startup reconciliation pass (§9),
/// and starts the watchdog.
pub async fn startup(config: Config) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.scratch_dir)?;

    let lock_file = acquire_lock(&config.lock_path)?;
    write_version_file(&config.version_path)?;

    let settings_store = FileSettingsStore::new(&config.state_dir);
    let settings = settings_store.get()?;

    let task_store = Arc::new(FileTaskStore::new(&config.state_dir));
    let broadcaster = Arc::new(Broadcaster::default());

    let (event_tx, event_rx) = mpsc::channel(256);

    let deps = SessionManagerDeps {
        store: Arc::clone(&task_store),
        notify: DesktopNotifyAdapter::new(),
        templates: Arc::new(DefaultTemplateRenderer),
        broadcaster: Arc::clone(&broadcaster),
        scratch_dir: config.scratch_dir.clone(),
        callback_base_url: crate::env::callback_base_url(config.http_addr),
        project_name: crate::env::project_name(),
    };

    let mut manager = AppSessionManager::new(
        deps,
        Arc::new(AnyCliAdapter::for_kind),
        Arc::new(AnyTerminalAdapter::for_kind),
        UuidIdGen,
        settings.clone(),
        event_tx,
    );

    let recovered = reconcile::reconcile_startup(&mut manager, task_store.as_ref()).await;
    if recovered > 0 {
        tracing::warn!(recovered, "marked stale in-flight tasks failed on startup");
    }

    let manager = Arc::new(Mutex::new(manager));
    spawn_event_router(event_rx, Arc::clone(&manager));

    let watchdog_interval =
        foreman_engine::env::watchdog_interval_ms().unwrap_or(settings.watchdog_interval);
    let watchdog = foreman_engine::spawn_watchdog(Arc::clone(&manager), SystemClock, watchdog_interval);

    Ok(DaemonState {
        config,
        lock_file,
        manager,
        broadcaster,
        watchdog,
    })
}

/// Folds monitor events back into the Session Manager (§4.4/§9): context
/// updates feed the Context Manager's trend history straight from output
/// parsing, not only from the CLI's own `notify_status` callback;
/// process-died and idle-lockup events resolve through the same logic the
/// watchdog's sweep uses, so a session doesn't have to wait for the next
/// sweep tick. Every other event variant is just logged at `debug` — the
/// Session Manager already persists and notifies synchronously on its own
/// operations (§4.8), and this task exists mainly so the bounded channel
/// never fills and starts silently dropping `try_send`s from elsewhere in
/// the manager.
fn spawn_event_router(mut event_rx: mpsc::Receiver<foreman_core::Event>, manager: Arc<Mutex<AppSessionManager>>) {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                foreman_core::Event::SessionContextUpdated { task_id, percent_remaining, .. } => {
                    manager.lock().await.record_context_observation(&task_id, percent_remaining);
                }
                foreman_core::Event::SessionProcessDied { task_id, .. } => {
                    let now = SystemClock.epoch_ms();
                    let mut guard = manager.lock().await;
                    if guard.has_live_session(&task_id) {
                        if let Err(err) = foreman_engine::handle_process_died(&mut guard, &task_id, now).await {
                            tracing::warn!(task_id = %task_id, error = %err, "event router: failed to handle process-died event");
                        }
                    }
                }
                foreman_core::Event::SessionIdle { task_id, .. } => {
                    let now = SystemClock.epoch_ms();
                    let mut guard = manager.lock().await;
                    if guard.has_live_session(&task_id) {
                        if let Err(err) = foreman_engine::handle_idle_lockup(&mut guard, &task_id, now).await {
                            tracing::warn!(task_id = %task_id, error = %err, "event router: failed to handle idle-lockup event");
                        }
                    }
                }
                other => {
                    tracing::debug!(event = other.name(), task_id = ?other.task_id(), "event");
                }
            }
        }
    });
}

fn acquire_lock(lock_path: &PathBuf) -> Result<File, LifecycleError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    file.try_lock_exclusive().map_err(|_| LifecycleError::LockFailed {
        path: lock_path.clone(),
    })?;
    let mut file = file;
    file.set_len(0)?;
    write!(file, "{}", std::process::id())?;
    Ok(file)
}

fn write_version_file(version_path: &PathBuf) -> Result<(), LifecycleError> {
    std::fs::write(version_path, env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
