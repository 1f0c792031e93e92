// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI adapters
//!
//! Per-CLI capability: build the launch command, detect the context-remaining
//! percentage from captured terminal output, detect idle/running state, and
//! derive the resume prompt injected when a session is restarted mid-task.

mod any;
mod claude;
mod codex;
mod gemini;

pub use any::AnyCliAdapter;
pub use claude::ClaudeCliAdapter;
pub use codex::CodexCliAdapter;
pub use gemini::GeminiCliAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CliCall, FakeCliAdapter};

use foreman_core::CliKind;
use std::path::Path;

/// Context for building the prompt injected when a session resumes mid-task.
#[derive(Debug, Clone)]
pub struct ResumeContext<'a> {
    /// Path to the Markdown document tracking this task's checkboxes.
    pub doc_path: &'a Path,
}

/// An interactive dialog recognized in freshly-spawned startup output,
/// before the CLI is ready to receive its initial prompt (§4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupDialog {
    /// A confirmation/trust dialog this adapter knows how to clear by
    /// sending the given keystroke, followed by Enter.
    Clearable(&'static str),
    /// A login/onboarding screen that cannot be cleared programmatically.
    LoginRequired,
}

/// Adapter for a single interactive CLI assistant.
///
/// Implementations are pure and synchronous: they never touch the network or
/// the filesystem themselves. They only know how to build a command line and
/// interpret text that a [`crate::terminal::TerminalAdapter`] has already
/// captured.
pub trait CliAdapter: Clone + Send + Sync + 'static {
    /// Which CLI this adapter drives.
    fn kind(&self) -> CliKind;

    /// Build the argv used to launch the CLI against `prompt_file` inside
    /// `directory`. `dangerous` opts into the CLI's auto-approve flag, if it
    /// has one.
    fn launch_command(&self, directory: &Path, prompt_file: &Path, dangerous: bool) -> Vec<String>;

    /// Inspect the latest terminal output for a context-remaining marker.
    ///
    /// Returns `None` when no marker is present in `output_chunk`; callers
    /// MUST treat that as "no new information", not as zero.
    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8>;

    /// Whether the tail of captured output matches this CLI's idle prompt.
    fn idle_signature(&self, output_tail: &str) -> bool;

    /// Text to inject when a session restarts mid-task: instructs the CLI to
    /// read the Markdown document and continue from the first unchecked
    /// checkbox.
    fn resume_prompt(&self, ctx: &ResumeContext<'_>) -> String;

    /// Inspect freshly captured startup output for one of this CLI's known
    /// interactive dialogs (§4.1): a trust/confirmation prompt it can clear
    /// on the task's behalf, or a login screen it cannot. Returns `None`
    /// once the CLI has moved past any such dialog.
    fn detect_startup_dialog(&self, output_tail: &str) -> Option<StartupDialog> {
        let _ = output_tail;
        None
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
