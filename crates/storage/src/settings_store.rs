// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Get/put of the process-wide `Settings` snapshot (§3's Settings store).

use crate::error::StorageError;
use foreman_core::Settings;
use std::fs;
use std::path::{Path, PathBuf};

pub trait SettingsStore: Send + Sync {
    /// Returns the default `Settings` when nothing has been persisted yet.
    fn get(&self) -> Result<Settings, StorageError>;
    fn put(&self, settings: &Settings) -> Result<(), StorageError>;
}

pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            path: root.into().join("settings.json"),
        }
    }

    fn io_err(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self) -> Result<Settings, StorageError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let bytes = fs::read(&self.path).map_err(|e| Self::io_err(&self.path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn put(&self, settings: &Settings) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_err(parent, e))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(settings)?;
        fs::write(&tmp_path, &bytes).map_err(|e| Self::io_err(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| Self::io_err(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_store_tests.rs"]
mod tests;
