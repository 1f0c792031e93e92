// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable CRUD of task records.
//!
//! The core only reads the fields `foreman_core::Task` defines and writes
//! `status`, `updated_at`, `completed_at` back — the rest of the real task
//! store's schema (project metadata, review artifacts, etc.) lives outside
//! this crate entirely. This is the minimal implementation needed to make
//! the core runnable: one JSON file per task, written atomically.

use crate::error::StorageError;
use foreman_core::{Task, TaskId};
use std::fs;
use std::path::{Path, PathBuf};

/// Durable store of task records, keyed by `TaskId`.
pub trait TaskStore: Send + Sync {
    fn get(&self, id: &TaskId) -> Result<Option<Task>, StorageError>;
    fn put(&self, task: &Task) -> Result<(), StorageError>;
    fn delete(&self, id: &TaskId) -> Result<(), StorageError>;
    /// All tasks, used by the daemon's startup reconciliation pass.
    fn list_all(&self) -> Result<Vec<Task>, StorageError>;
}

/// File-backed `TaskStore`: one JSON file per task under `<root>/tasks/`.
///
/// Writes go to a `.tmp` sibling first, then an atomic rename, so a crash
/// mid-write never leaves a corrupt task file behind.
pub struct FileTaskStore {
    root: PathBuf,
}

impl FileTaskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn task_path(&self, id: &TaskId) -> PathBuf {
        self.root.join("tasks").join(format!("{id}.json"))
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn io_err(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl TaskStore for FileTaskStore {
    fn get(&self, id: &TaskId) -> Result<Option<Task>, StorageError> {
        let path = self.task_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|e| Self::io_err(&path, e))?;
        let task: Task = serde_json::from_slice(&bytes)?;
        Ok(Some(task))
    }

    fn put(&self, task: &Task) -> Result<(), StorageError> {
        let dir = self.tasks_dir();
        fs::create_dir_all(&dir).map_err(|e| Self::io_err(&dir, e))?;
        let path = self.task_path(&task.id);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(task)?;
        fs::write(&tmp_path, &bytes).map_err(|e| Self::io_err(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| Self::io_err(&path, e))?;
        tracing::debug!(task_id = %task.id, status = %task.status, "task persisted");
        Ok(())
    }

    fn delete(&self, id: &TaskId) -> Result<(), StorageError> {
        let path = self.task_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(&path, e)),
        }
    }

    fn list_all(&self) -> Result<Vec<Task>, StorageError> {
        let dir = self.tasks_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut tasks = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| Self::io_err(&dir, e))? {
            let entry = entry.map_err(|e| Self::io_err(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|e| Self::io_err(&path, e))?;
            match serde_json::from_slice::<Task>(&bytes) {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable task file"),
            }
        }
        tasks.sort_by_key(|t| t.created_at_epoch_ms);
        Ok(tasks)
    }
}

#[cfg(test)]
#[path = "task_store_tests.rs"]
mod tests;
