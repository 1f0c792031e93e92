// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Manager (§4.6): the admission-control and lifecycle authority.
//! Owns the live registry, `active_count`, and the FIFO `waiting_queue`.
//!
//! Each public operation logs the `foreman_core::Effect`s it performs
//! (`effect.name()` / `effect.fields()`) as structured tracing fields, in
//! the teacher's manner (§4.8) of naming spans after the operation with
//! key-value fields for task/session ids — the effect vocabulary documents
//! what happened without requiring a separate pure-decision/executor split.
//!
//! Callers serialize operations per task id (§5's single-writer invariant);
//! this type does not itself implement locking — the daemon's command loop
//! provides that ordering guarantee.

use crate::broadcaster::{Broadcaster, PoolSnapshot, SessionSnapshot};
use crate::context::ContextManager;
use crate::error::SessionManagerError;
use crate::monitor::{spawn_monitor, MonitorHandle};
use crate::templates::{TemplateKind, TemplateRenderer};
use foreman_adapters::cli::{CliAdapter, ResumeContext, StartupDialog};
use foreman_adapters::notify::NotifyAdapter;
use foreman_adapters::terminal::{TerminalAdapter, TerminalError, TerminalHandle};
use foreman_core::{
    CallbackStatus, CliKind, Effect, Event, FailureReason, IdGen, Session, SessionId, Settings,
    ShortId, Task, TaskId, TaskStatus, TerminalKind,
};
use foreman_storage::TaskStore;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Wall-clock timeout on a spawn attempt before *SpawnTimeout* is raised
/// (§5: default 10s).
pub const DEFAULT_SPAWN_TIMEOUT: Duration = Duration::from_secs(10);
/// Grace window `stop` waits for the terminal to confirm a close (§4.6: 5s).
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);
/// Bound on startup-dialog clearing attempts, so a CLI stuck printing an
/// unrecognized dialog still fails the spawn instead of looping forever.
const MAX_STARTUP_DIALOG_POLLS: u32 = 5;

/// Which of the three prompt-selection paths a `spawn_session` call is
/// taking (§4.6/§4.7): the initial prompt, the resume prompt after a
/// restart, or the cross-review prompt handed to the review CLI once a
/// task's own work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpawnPurpose {
    Initial,
    Resume,
    Review,
}

pub struct SessionManagerDeps<S, N>
where
    S: TaskStore,
    N: NotifyAdapter,
{
    pub store: Arc<S>,
    pub notify: N,
    pub templates: Arc<dyn TemplateRenderer>,
    pub broadcaster: Arc<Broadcaster>,
    /// Directory scratch prompt files are rendered into.
    pub scratch_dir: PathBuf,
    pub callback_base_url: String,
    pub project_name: String,
}

struct LiveSession<C, T> {
    session: Session,
    cli: C,
    terminal: T,
    handle: TerminalHandle,
    monitor: MonitorHandle,
}

/// Builds a concrete adapter for a resolved kind. In production this is
/// `AnyCliAdapter::for_kind` / `AnyTerminalAdapter::for_kind`; tests inject a
/// factory that hands back a single pre-configured fake regardless of kind,
/// the way the teacher's `Executor<S, A, N, C>` takes its adapter as a type
/// parameter so fakes can stand in without touching real subprocesses.
pub type CliFactory<C> = Arc<dyn Fn(CliKind) -> C + Send + Sync>;
pub type TerminalFactory<T> = Arc<dyn Fn(TerminalKind) -> T + Send + Sync>;

pub struct SessionManager<C, T, S, N, I>
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    pub(crate) deps: SessionManagerDeps<S, N>,
    cli_factory: CliFactory<C>,
    terminal_factory: TerminalFactory<T>,
    id_gen: I,
    settings: Settings,
    live: HashMap<TaskId, LiveSession<C, T>>,
    waiting_queue: VecDeque<TaskId>,
    active_count: usize,
    context: ContextManager,
    event_tx: mpsc::Sender<Event>,
    spawn_timeout: Duration,
    stop_grace: Duration,
}

impl<C, T, S, N, I> SessionManager<C, T, S, N, I>
where
    C: CliAdapter,
    T: TerminalAdapter,
    S: TaskStore,
    N: NotifyAdapter,
    I: IdGen,
{
    pub fn new(
        deps: SessionManagerDeps<S, N>,
        cli_factory: CliFactory<C>,
        terminal_factory: TerminalFactory<T>,
        id_gen: I,
        settings: Settings,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            deps,
            cli_factory,
            terminal_factory,
            id_gen,
            settings,
            live: HashMap::new(),
            waiting_queue: VecDeque::new(),
            active_count: 0,
            context: ContextManager::new(),
            event_tx,
            spawn_timeout: DEFAULT_SPAWN_TIMEOUT,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn has_live_session(&self, task_id: &TaskId) -> bool {
        self.live.contains_key(task_id)
    }

    pub fn waiting_queue(&self) -> &VecDeque<TaskId> {
        &self.waiting_queue
    }

    /// `list_sessions` (§6): `(sessions, active, max_concurrent, available_slots)`.
    pub fn snapshot(&self) -> PoolSnapshot {
        let sessions = self
            .live
            .values()
            .map(|entry| {
                let status = self
                    .deps
                    .store
                    .get(&entry.session.task_id)
                    .ok()
                    .flatten()
                    .map(|t| t.status)
                    .unwrap_or(TaskStatus::InProgress);
                SessionSnapshot {
                    task_id: entry.session.task_id.clone(),
                    status,
                    pid: entry.handle.pid,
                    started_at_epoch_ms: Some(entry.session.started_at_epoch_ms),
                    context_usage_percent: entry.session.last_context_percent,
                }
            })
            .collect();
        PoolSnapshot {
            sessions,
            count: self.active_count,
            max_concurrent: self.settings.max_concurrent_sessions,
        }
    }

    fn publish_snapshot(&self) {
        self.deps.broadcaster.publish(self.snapshot());
    }

    /// Which CLI kind a spawn should launch: the task's own worker CLI for
    /// an initial/resume spawn, or `Settings::review_cli` for a cross-review
    /// spawn (§1, §4.6 step 1).
    fn resolve_cli_kind(&self, task: &Task, purpose: SpawnPurpose) -> CliKind {
        match purpose {
            SpawnPurpose::Review => self.settings.review_cli,
            SpawnPurpose::Initial | SpawnPurpose::Resume => {
                task.cli_override.unwrap_or(self.settings.default_cli)
            }
        }
    }

    fn resolve_cli(&self, kind: CliKind) -> C {
        (self.cli_factory)(kind)
    }

    /// "Auto by platform" unless the operator fixed a preference (§4.2).
    fn resolve_terminal(&self) -> T {
        let kind = self.settings.terminal_preference.unwrap_or_else(|| {
            if cfg!(target_os = "windows") {
                TerminalKind::WindowsTerminal
            } else if cfg!(target_os = "macos") {
                TerminalKind::ITerm
            } else {
                TerminalKind::Kitty
            }
        });
        (self.terminal_factory)(kind)
    }

    fn callback_url(&self, task_id: &TaskId) -> String {
        format!("{}/tasks/{}/notify_status", self.deps.callback_base_url, task_id)
    }

    /// `cli_kind` names the CLI the rendered prompt should refer to: for the
    /// review template this is the *worker's* CLI kind, not the reviewer's
    /// (the review prompt tells the reviewer what the original work was
    /// produced with).
    fn render_vars(&self, task: &Task, cli_kind: CliKind) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("project_name".to_string(), self.deps.project_name.clone());
        vars.insert("doc_path".to_string(), task.doc_path.display().to_string());
        vars.insert(
            "full_doc_path".to_string(),
            task.project_dir.join(&task.doc_path).display().to_string(),
        );
        vars.insert("task_id".to_string(), task.id.to_string());
        vars.insert("cli_type".to_string(), cli_kind.to_string());
        vars.insert(
            "review_enabled".to_string(),
            task.review_mode.resolve(self.settings.review_enabled).to_string(),
        );
        vars.insert("callback_url".to_string(), self.callback_url(&task.id));
        vars
    }

    fn write_prompt_file(&self, task_id: &TaskId, contents: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.deps.scratch_dir)?;
        let path = self
            .deps
            .scratch_dir
            .join(format!("{task_id}-{}.prompt", self.id_gen.next().short(8)));
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// §4.6 `start`: fails fast with *InvalidState* if the task is not
    /// `pending`; otherwise spawns immediately or enqueues.
    pub async fn start(
        &mut self,
        task_id: &TaskId,
        now_epoch_ms: u64,
        dangerous: bool,
    ) -> Result<(), SessionManagerError> {
        let mut task = self.load_task(task_id)?;
        if task.status != TaskStatus::Pending {
            return Err(SessionManagerError::InvalidState {
                task_id: task_id.clone(),
                status: task.status,
            });
        }

        if self.active_count >= self.settings.max_concurrent_sessions {
            self.waiting_queue.push_back(task_id.clone());
            let _ = self.event_tx.try_send(Event::TaskQueued { task_id: task_id.clone() });
            return Err(SessionManagerError::Queued {
                task_id: task_id.clone(),
                active: self.active_count,
                max_concurrent: self.settings.max_concurrent_sessions,
            });
        }

        self.spawn_session(&mut task, now_epoch_ms, dangerous, SpawnPurpose::Initial).await
    }

    /// Shared by `start`, `restart`, and `enter_review`: all-or-nothing spawn
    /// transaction (§4.6). Any failure before the final registration step
    /// leaves `active_count` and the registry untouched.
    async fn spawn_session(
        &mut self,
        task: &mut Task,
        now_epoch_ms: u64,
        dangerous: bool,
        purpose: SpawnPurpose,
    ) -> Result<(), SessionManagerError> {
        let cli_kind = self.resolve_cli_kind(task, purpose);
        let cli = self.resolve_cli(cli_kind);
        let terminal = self.resolve_terminal();

        let prompt = match purpose {
            SpawnPurpose::Resume => cli.resume_prompt(&ResumeContext { doc_path: &task.doc_path }),
            SpawnPurpose::Initial => {
                let vars = self.render_vars(task, cli_kind);
                self.deps.templates.render(TemplateKind::InitialTask, &vars)
            }
            SpawnPurpose::Review => {
                let worker_cli_kind = task.cli_override.unwrap_or(self.settings.default_cli);
                let vars = self.render_vars(task, worker_cli_kind);
                self.deps.templates.render(TemplateKind::Review, &vars)
            }
        };
        let prompt_file = self.write_prompt_file(&task.id, &prompt).map_err(|e| {
            SessionManagerError::AdapterUnavailable {
                task_id: task.id.clone(),
                message: format!("failed to write scratch prompt file: {e}"),
            }
        })?;

        let argv = cli.launch_command(&task.project_dir, &prompt_file, dangerous);
        let spawn_effect = Effect::SpawnSession {
            task_id: task.id.clone(),
            cli: cli.kind(),
            terminal: terminal.kind(),
            project_dir: task.project_dir.clone(),
            prompt_file: prompt_file.clone(),
            dangerous,
        };
        tracing::info!(
            effect = spawn_effect.name(),
            task_id = %task.id,
            cli = %cli.kind(),
            terminal = %terminal.kind(),
            purpose = ?purpose,
            "spawning session"
        );

        let poll_interval = crate::env::startup_dialog_poll_ms();
        let spawn_result = tokio::time::timeout(self.spawn_timeout, async {
            let handle = terminal.spawn(&task.project_dir, &argv).await?;
            clear_startup_dialogs(&cli, &terminal, &handle, poll_interval, MAX_STARTUP_DIALOG_POLLS).await?;
            Ok::<_, TerminalError>(handle)
        })
        .await;

        let handle = match spawn_result {
            Err(_) => {
                let err = SessionManagerError::SpawnTimeout {
                    task_id: task.id.clone(),
                    elapsed_ms: self.spawn_timeout.as_millis() as u64,
                };
                let _ = self.event_tx.try_send(Event::SessionSpawnFailed {
                    task_id: task.id.clone(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
            Ok(Err(source)) => {
                let err = SessionManagerError::SpawnFailed {
                    task_id: task.id.clone(),
                    source,
                };
                let _ = self.event_tx.try_send(Event::SessionSpawnFailed {
                    task_id: task.id.clone(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
            Ok(Ok(handle)) => handle,
        };

        let session_id = SessionId::new(self.id_gen.next());
        let mut session = Session::new(
            session_id.clone(),
            task.id.clone(),
            cli.kind(),
            terminal.kind(),
            now_epoch_ms,
        );
        session.pid = handle.pid;
        if purpose == SpawnPurpose::Resume {
            session.bump_generation();
        }

        let monitor = spawn_monitor(
            task.id.clone(),
            session_id.clone(),
            cli.clone(),
            terminal.clone(),
            handle.clone(),
            self.event_tx.clone(),
            crate::env::monitor_poll_ms(),
        );

        let _ = self.event_tx.try_send(Event::SessionSpawned {
            task_id: task.id.clone(),
            session_id: session_id.clone(),
            pid: handle.pid,
        });

        self.live.insert(
            task.id.clone(),
            LiveSession {
                session,
                cli,
                terminal,
                handle,
                monitor,
            },
        );
        self.active_count += 1;

        match purpose {
            SpawnPurpose::Review => {
                // The task is already `in_reviewing`; a review spawn only
                // attaches a live session, it does not change task status.
            }
            SpawnPurpose::Initial | SpawnPurpose::Resume => {
                task.transition(TaskStatus::InProgress, now_epoch_ms, None)
                    .map_err(|e| SessionManagerError::AdapterUnavailable {
                        task_id: task.id.clone(),
                        message: e.to_string(),
                    })?;
                self.persist(task)?;
            }
        }
        self.deps.broadcaster.publish(self.snapshot());
        Ok(())
    }

    fn load_task(&self, task_id: &TaskId) -> Result<Task, SessionManagerError> {
        self.deps
            .store
            .get(task_id)?
            .ok_or_else(|| SessionManagerError::NoSession { task_id: task_id.clone() })
    }

    fn persist(&self, task: &Task) -> Result<(), SessionManagerError> {
        tracing::info!(
            effect = Effect::PersistTaskStatus { task_id: task.id.clone() }.name(),
            task_id = %task.id,
            status = %task.status,
            "task status persisted"
        );
        self.deps.store.put(task)?;
        Ok(())
    }

    /// §4.6 `stop`: marks stopping, closes the terminal, removes the
    /// registry entry after confirmation or the grace window, decrements
    /// `active_count`, then tries to advance the waiting queue. Does not
    /// decide the resulting task status — callers (the watchdog, the HTTP
    /// layer, or `restart`) apply that separately via the Task State Machine.
    pub async fn stop(&mut self, task_id: &TaskId) -> Result<(), SessionManagerError> {
        let mut entry = self
            .live
            .remove(task_id)
            .ok_or_else(|| SessionManagerError::NoSession { task_id: task_id.clone() })?;

        entry.session.phase = foreman_core::RunPhase::Stopping;
        entry.monitor.stop();
        self.context.forget(&entry.session.id);

        let close_effect = Effect::CloseSession { session_id: entry.session.id.clone() };
        tracing::info!(effect = close_effect.name(), task_id = %task_id, "closing session");
        match tokio::time::timeout(self.stop_grace, entry.terminal.close(&entry.handle)).await {
            Ok(Ok(())) => {
                let _ = self.event_tx.try_send(Event::SessionExited {
                    task_id: task_id.clone(),
                    session_id: entry.session.id.clone(),
                    exit_code: None,
                });
            }
            Ok(Err(err)) => {
                tracing::warn!(task_id = %task_id, error = %err, "close reported an error; treating as best-effort");
            }
            Err(_) => {
                tracing::warn!(task_id = %task_id, "close did not confirm within the grace window");
            }
        }
        entry.monitor.abort();

        self.active_count = self.active_count.saturating_sub(1);
        self.publish_snapshot();
        Ok(())
    }

    /// §4.6 `pause`: a soft stop that leaves the task's status untouched.
    pub async fn pause(&mut self, task_id: &TaskId) -> Result<(), SessionManagerError> {
        self.stop(task_id).await
    }

    /// §4.6 `stop_all`: every stop is independent; failures are collected.
    pub async fn stop_all(&mut self) -> Vec<(TaskId, Result<(), SessionManagerError>)> {
        let ids: Vec<TaskId> = self.live.keys().cloned().collect();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let result = self.stop(&id).await;
            results.push((id, result));
        }
        results
    }

    /// §4.6 `restart`: stop + immediate re-start, bypassing admission so the
    /// task keeps its slot. The resume prompt replaces the initial prompt.
    pub async fn restart(
        &mut self,
        task_id: &TaskId,
        now_epoch_ms: u64,
        reason: &str,
    ) -> Result<(), SessionManagerError> {
        tracing::info!(task_id = %task_id, reason, "restarting session");

        let mut entry = self
            .live
            .remove(task_id)
            .ok_or_else(|| SessionManagerError::NoSession { task_id: task_id.clone() })?;
        entry.monitor.stop();
        let _ = tokio::time::timeout(self.stop_grace, entry.terminal.close(&entry.handle)).await;
        entry.monitor.abort();
        self.context.forget(&entry.session.id);
        // Slot is retained: active_count is not decremented.

        let mut task = self.load_task(task_id)?;
        self.spawn_session(&mut task, now_epoch_ms, false, SpawnPurpose::Resume).await
    }

    /// Tries to admit the next queued task into a freed slot. Queued tasks
    /// that fail to spawn are dropped from the queue (their error already
    /// surfaced through `start`'s caller at enqueue time would not re-fire
    /// here, so failures are logged and the task is left `pending`).
    pub async fn advance_waiting_queue(&mut self, now_epoch_ms: u64) {
        while self.active_count < self.settings.max_concurrent_sessions {
            let Some(task_id) = self.waiting_queue.pop_front() else {
                break;
            };
            match self.start(&task_id, now_epoch_ms, false).await {
                Ok(()) | Err(SessionManagerError::Queued { .. }) => {}
                Err(err) => {
                    tracing::warn!(task_id = %task_id, error = %err, "queued task failed to spawn on admission");
                }
            }
        }
    }

    /// Records a freshly observed context-remaining percentage (from the
    /// monitor's `SessionContextUpdated` event or a `notify_status`
    /// callback) against both the live `Session` and the Context Manager's
    /// trend history.
    pub fn record_context_observation(&mut self, task_id: &TaskId, percent: u8) {
        if let Some(entry) = self.live.get_mut(task_id) {
            entry.session.observe_context_percent(percent);
            self.context.record_sample(entry.session.id.clone(), percent);
        }
    }

    /// §4.4: true iff the Context Manager's restart advisory fires for this
    /// session right now.
    pub fn should_restart(&self, task_id: &TaskId, now_epoch_ms: u64) -> bool {
        self.live
            .get(task_id)
            .map(|entry| ContextManager::should_restart(&entry.session, &self.settings, now_epoch_ms))
            .unwrap_or(false)
    }

    /// Every task id with a live session, for the watchdog's sweep.
    pub fn live_task_ids(&self) -> HashSet<TaskId> {
        self.live.keys().cloned().collect()
    }

    pub fn session_handle(&self, task_id: &TaskId) -> Option<(&T, &TerminalHandle)> {
        self.live.get(task_id).map(|e| (&e.terminal, &e.handle))
    }

    pub fn cli_for(&self, task_id: &TaskId) -> Option<&C> {
        self.live.get(task_id).map(|e| &e.cli)
    }

    pub fn session_for(&self, task_id: &TaskId) -> Option<&Session> {
        self.live.get(task_id).map(|e| &e.session)
    }

    /// The settings this manager was constructed with, for the watchdog's
    /// heartbeat-timeout and review-enabled lookups.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads a task's current persisted record. Exposed for the watchdog's
    /// checkbox-progress disambiguation, which needs `project_dir`/`doc_path`
    /// without re-deriving the Task Store wiring.
    pub fn task(&self, task_id: &TaskId) -> Result<Task, SessionManagerError> {
        self.load_task(task_id)
    }

    /// Best-effort event publish for callers outside this module (the
    /// watchdog) that need to report a session outcome on the shared event
    /// channel without reaching into private state.
    pub(crate) fn emit_event(&self, event: Event) {
        let _ = self.event_tx.try_send(event);
    }

    /// Transitions a task into `in_reviewing` and immediately spawns a
    /// session with the review CLI (§1, §4.6/§4.7): cross-review always runs
    /// under a live session, it never leaves a task in `in_reviewing` with
    /// nothing attached. Falls back to `failed` if the review session itself
    /// cannot be spawned.
    pub async fn enter_review(&mut self, task_id: &TaskId, now_epoch_ms: u64) -> Result<(), SessionManagerError> {
        self.finish_task(task_id, TaskStatus::InReviewing, now_epoch_ms, None).await?;
        let mut task = self.load_task(task_id)?;
        match self
            .spawn_session(&mut task, now_epoch_ms, false, SpawnPurpose::Review)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(task_id = %task_id, error = %err, "failed to spawn review session, failing task");
                let reason = failure_reason_for_spawn_error(&err);
                self.finish_task(task_id, TaskStatus::Failed, now_epoch_ms, Some(reason)).await
            }
        }
    }

    /// Stamps the last-observed-liveness timestamp on a live session (§4.5:
    /// the Watchdog's fallback heartbeat check reads this when `is_alive`
    /// cannot give a definite answer).
    pub fn touch_liveness(&mut self, task_id: &TaskId, now_epoch_ms: u64) {
        if let Some(entry) = self.live.get_mut(task_id) {
            entry.session.last_liveness_epoch_ms = now_epoch_ms;
        }
    }

    /// Transitions a task and persists it, emitting the `TaskTransitioned`
    /// event and a notification when the outcome is `failed` (§4.8's
    /// lifecycle transitions are logged at `info`; failures additionally
    /// notify the operator per the Notify effect).
    pub async fn finish_task(
        &mut self,
        task_id: &TaskId,
        to: TaskStatus,
        now_epoch_ms: u64,
        failure_reason: Option<FailureReason>,
    ) -> Result<(), SessionManagerError> {
        let mut task = self.load_task(task_id)?;
        let from = task.status;
        task.transition(to, now_epoch_ms, failure_reason.clone())
            .map_err(|e| SessionManagerError::AdapterUnavailable {
                task_id: task_id.clone(),
                message: e.to_string(),
            })?;
        self.persist(&task)?;
        let _ = self
            .event_tx
            .try_send(Event::TaskTransitioned { task_id: task_id.clone(), from, to });

        if to == TaskStatus::Failed {
            if let Some(reason) = failure_reason {
                let _ = self
                    .deps
                    .notify
                    .notify(
                        &format!("Task {task_id} failed"),
                        &reason.to_string(),
                    )
                    .await;
            }
        }
        Ok(())
    }

    /// §6 `notify_status`: the CLI callback's advisory status report. This
    /// competes with output parsing — whichever arrives first wins — so a
    /// callback is a no-op once the task has already reached a terminal
    /// status; it can never regress `completed`/`failed` back to
    /// `in_progress`.
    pub async fn record_task_callback(
        &mut self,
        task_id: &TaskId,
        status: CallbackStatus,
        context_percent: Option<u8>,
        message: Option<String>,
        now_epoch_ms: u64,
    ) -> Result<(), SessionManagerError> {
        let _ = self.event_tx.try_send(Event::TaskCallback {
            task_id: task_id.clone(),
            status,
            context_percent,
            message: message.clone(),
        });

        if let Some(percent) = context_percent {
            self.record_context_observation(task_id, percent);
        }

        if status == CallbackStatus::InProgress {
            return Ok(());
        }

        let task = self.load_task(task_id)?;
        if task.status.is_terminal() {
            tracing::info!(task_id = %task_id, ?status, "ignoring callback, task already settled");
            return Ok(());
        }

        if self.live.contains_key(task_id) {
            self.stop(task_id).await?;
        }

        match status {
            CallbackStatus::InProgress => unreachable!("handled above"),
            CallbackStatus::Completed => {
                let review_enabled = task.review_mode.resolve(self.settings.review_enabled);
                if review_enabled {
                    self.enter_review(task_id, now_epoch_ms).await
                } else {
                    self.finish_task(task_id, TaskStatus::Completed, now_epoch_ms, None).await
                }
            }
            CallbackStatus::Failed => {
                let reason = FailureReason::ReportedFailure(message.unwrap_or_else(|| "no message".to_string()));
                self.finish_task(task_id, TaskStatus::Failed, now_epoch_ms, Some(reason)).await
            }
        }
    }
}

fn failure_reason_for_spawn_error(err: &SessionManagerError) -> FailureReason {
    match err {
        SessionManagerError::SpawnFailed { source, .. } => FailureReason::SpawnFailed(source.to_string()),
        SessionManagerError::SpawnTimeout { .. } => FailureReason::SpawnTimeout,
        SessionManagerError::AdapterUnavailable { message, .. } => {
            FailureReason::AdapterUnavailable(message.clone())
        }
        other => FailureReason::AdapterUnavailable(other.to_string()),
    }
}

/// Polls freshly captured startup output for one of the CLI's known
/// interactive dialogs (§4.1) and clears the ones it can, up to
/// `max_polls` attempts. Returns `Err` if a login screen is detected — that
/// case cannot be cleared programmatically and must surface as a failed
/// spawn with an actionable message.
async fn clear_startup_dialogs<C, T>(
    cli: &C,
    terminal: &T,
    handle: &TerminalHandle,
    poll_interval: Duration,
    max_polls: u32,
) -> Result<(), TerminalError>
where
    C: CliAdapter,
    T: TerminalAdapter,
{
    for _ in 0..max_polls {
        let output = terminal.capture_output(handle, crate::monitor::CAPTURE_LINES).await?;
        match cli.detect_startup_dialog(&output) {
            Some(StartupDialog::LoginRequired) => {
                return Err(TerminalError::Unsupported(
                    "login_required",
                    format!(
                        "{} requires interactive login; run `{} login` once, then retry",
                        cli.kind(),
                        cli.kind()
                    ),
                ));
            }
            Some(StartupDialog::Clearable(keys)) => {
                terminal.send(handle, keys).await?;
                terminal.send_enter(handle).await?;
                tokio::time::sleep(poll_interval).await;
            }
            None => return Ok(()),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_manager_tests.rs"]
mod tests;
