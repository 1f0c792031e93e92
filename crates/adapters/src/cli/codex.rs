// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenAI Codex CLI adapter.

use super::{CliAdapter, ResumeContext, StartupDialog};
use foreman_core::CliKind;
use std::path::Path;

/// Codex prints remaining context budget as a percentage of the model's
/// window, e.g. `"78% context remaining"`.
const CONTEXT_MARKERS: &[&str] = &["% context remaining"];

/// Codex's idle input box ends in a bare `›` prompt.
const IDLE_MARKERS: &[&str] = &["\n\u{203a} ", "\nsend a message"];

/// The sandbox/approval confirmation shown on first launch in a new
/// directory; `y` accepts and clears it.
const CONFIRM_DIALOG_MARKER: &str = "continue in this folder?";

/// Printed when the CLI has no stored credentials and is waiting on
/// `codex login`.
const LOGIN_MARKER: &str = "sign in with chatgpt";

#[derive(Clone, Copy, Debug, Default)]
pub struct CodexCliAdapter;

impl CodexCliAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl CliAdapter for CodexCliAdapter {
    fn kind(&self) -> CliKind {
        CliKind::Codex
    }

    fn launch_command(&self, directory: &Path, prompt_file: &Path, dangerous: bool) -> Vec<String> {
        let mut argv = vec![
            "codex".to_string(),
            "--cd".to_string(),
            directory.display().to_string(),
        ];
        if dangerous {
            argv.push("--dangerously-bypass-approvals-and-sandbox".to_string());
        }
        argv.push(format!("$(cat {})", prompt_file.display()));
        argv
    }

    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8> {
        parse_percent_before_any_marker(output_chunk, CONTEXT_MARKERS)
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
            Some(StartupDialog::Clearable("y"))
        } else {
            None
        }
    }
}

/// Find the last occurrence of any marker and parse the integer percentage
/// that immediately *precedes* it.
fn parse_percent_before_any_marker(text: &str, markers: &[&str]) -> Option<u8> {
    let lower = text.to_lowercase();
    let mut best: Option<(usize, &str)> = None;
    for marker in markers {
        if let Some(idx) = lower.rfind(marker) {
            if best.is_none_or(|(best_idx, _)| idx > best_idx) {
                best = Some((idx, marker));
            }
        }
    }
    let (idx, _marker) = best?;
    let before = &lower[..idx];
    let digits: String = before
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse::<u8>().ok().map(|p| p.min(100))
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
