// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake CLI adapter for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CliAdapter, ResumeContext, StartupDialog};
use foreman_core::CliKind;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded call to FakeCliAdapter
#[derive(Debug, Clone)]
pub enum CliCall {
    LaunchCommand { directory: PathBuf, dangerous: bool },
    ParseContextRemaining { output_chunk: String },
    IdleSignature { output_tail: String },
    ResumePrompt,
    DetectStartupDialog { output_tail: String },
}

#[derive(Clone)]
pub struct FakeCliAdapter {
    inner: Arc<Mutex<FakeCliState>>,
}

struct FakeCliState {
    kind: CliKind,
    calls: Vec<CliCall>,
    context_remaining: Option<u8>,
    idle: bool,
    startup_dialog: Option<StartupDialog>,
}

impl FakeCliAdapter {
    pub fn new(kind: CliKind) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeCliState {
                kind,
                calls: Vec::new(),
                context_remaining: None,
                idle: false,
                startup_dialog: None,
            })),
        }
    }

    pub fn calls(&self) -> Vec<CliCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_context_remaining(&self, percent: Option<u8>) {
        self.inner.lock().context_remaining = percent;
    }

    pub fn set_idle(&self, idle: bool) {
        self.inner.lock().idle = idle;
    }

    /// Controls what the next `detect_startup_dialog` call(s) report; `None`
    /// (the default) means no dialog is showing.
    pub fn set_startup_dialog(&self, dialog: Option<StartupDialog>) {
        self.inner.lock().startup_dialog = dialog;
    }
}

impl CliAdapter for FakeCliAdapter {
    fn kind(&self) -> CliKind {
        self.inner.lock().kind
    }

    fn launch_command(&self, directory: &Path, _prompt_file: &Path, dangerous: bool) -> Vec<String> {
        self.inner.lock().calls.push(CliCall::LaunchCommand {
            directory: directory.to_path_buf(),
            dangerous,
        });
        vec!["fake-cli".to_string()]
    }

    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8> {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::ParseContextRemaining {
            output_chunk: output_chunk.to_string(),
        });
        inner.context_remaining
    }

    fn idle_signature(&self, output_tail: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::IdleSignature {
            output_tail: output_tail.to_string(),
        });
        inner.idle
    }

    fn resume_prompt(&self, _ctx: &ResumeContext<'_>) -> String {
        self.inner.lock().calls.push(CliCall::ResumePrompt);
        "resume".to_string()
    }

    fn detect_startup_dialog(&self, output_tail: &str) -> Option<StartupDialog> {
        let mut inner = self.inner.lock();
        inner.calls.push(CliCall::DetectStartupDialog {
            output_tail: output_tail.to_string(),
        });
        inner.startup_dialog.clone()
    }
}
