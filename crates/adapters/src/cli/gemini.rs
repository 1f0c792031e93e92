// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Google Gemini CLI adapter.

use super::{CliAdapter, ResumeContext, StartupDialog};
use foreman_core::CliKind;
use std::path::Path;

/// Gemini prints context usage as `"context used: 34%"` rather than the
/// remaining budget, so the adapter inverts the reading.
const CONTEXT_USED_MARKERS: &[&str] = &["context used:"];

const IDLE_MARKERS: &[&str] = &["\ntype your message", "\n> "];

/// The workspace-access confirmation shown on first launch; option 1
/// ("Yes, allow access") clears it.
const CONFIRM_DIALOG_MARKER: &str = "allow gemini cli to access this folder";

/// Printed when the CLI is waiting on an interactive Google sign-in.
const LOGIN_MARKER: &str = "sign in with your google account";

#[derive(Clone, Copy, Debug, Default)]
pub struct GeminiCliAdapter;

impl GeminiCliAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl CliAdapter for GeminiCliAdapter {
    fn kind(&self) -> CliKind {
        CliKind::Gemini
    }

    fn launch_command(&self, directory: &Path, prompt_file: &Path, dangerous: bool) -> Vec<String> {
        let mut argv = vec![
            "gemini".to_string(),
            "--workspace".to_string(),
            directory.display().to_string(),
        ];
        if dangerous {
            argv.push("--yolo".to_string());
        }
        argv.push(format!("$(cat {})", prompt_file.display()));
        argv
    }

    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8> {
        let lower = output_chunk.to_lowercase();
        let marker = CONTEXT_USED_MARKERS
            .iter()
            .filter_map(|m| lower.rfind(m).map(|idx| (idx, *m)))
            .max_by_key(|(idx, _)| *idx)?;
        let (idx, marker_text) = marker;
        let after = lower[idx + marker_text.len()..].trim_start();
        let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
        let used = digits.parse::<u8>().ok()?.min(100);
        Some(100 - used)
    }

    fn idle_signature(&self, output_tail: &str) -> bool {
        IDLE_MARKERS.iter().any(|m| output_tail.contains(m))
    }

    fn resume_prompt(&self, ctx: &ResumeContext<'_>) -> String {
        format!(
            "Read {} and continue from the first unchecked checkbox. \
             Do not repeat work already marked complete.",
            ctx.doc_path.display()
        )
    }

    fn detect_startup_dialog(&self, output_tail: &str) -> Option<StartupDialog> {
        let lower = output_tail.to_lowercase();
        if lower.contains(LOGIN_MARKER) {
            Some(StartupDialog::LoginRequired)
        } else if lower.contains(CONFIRM_DIALOG_MARKER) {
            Some(StartupDialog::Clearable("1"))
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
