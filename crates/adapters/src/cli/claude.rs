// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claude Code CLI adapter.

use super::{CliAdapter, ResumeContext, StartupDialog};
use foreman_core::CliKind;
use std::path::Path;

/// Markers Claude Code prints in its status line as its context window
/// fills up, e.g. `"Context left until auto-compact: 23%"`.
const CONTEXT_MARKERS: &[&str] = &["context left until auto-compact:", "context left:"];

/// Substrings that appear in Claude Code's idle input box, not while a turn
/// is in flight.
const IDLE_MARKERS: &[&str] = &["? for shortcuts", "\n> "];

/// The folder-trust confirmation shown on first launch in a new directory;
/// option 1 ("Yes, proceed") clears it.
const TRUST_DIALOG_MARKER: &str = "do you trust the files in this folder";

/// Printed when no credentials are on file and the CLI is waiting on an
/// interactive `/login` flow.
const LOGIN_MARKER: &str = "please run /login";

#[derive(Clone, Copy, Debug, Default)]
pub struct ClaudeCliAdapter;

impl ClaudeCliAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl CliAdapter for ClaudeCliAdapter {
    fn kind(&self) -> CliKind {
        CliKind::Claude
    }

    fn launch_command(&self, directory: &Path, prompt_file: &Path, dangerous: bool) -> Vec<String> {
        let mut argv = vec![
            "claude".to_string(),
            "--add-dir".to_string(),
            directory.display().to_string(),
        ];
        if dangerous {
            argv.push("--dangerously-skip-permissions".to_string());
        }
        argv.push(format!("$(cat {})", prompt_file.display()));
        argv
    }

    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8> {
        parse_percent_after_any_marker(output_chunk, CONTEXT_MARKERS)
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
        } else if lower.contains(TRUST_DIALOG_MARKER) {
            Some(StartupDialog::Clearable("1"))
        } else {
            None
        }
    }
}

/// Find the last occurrence of any marker in `text` and parse the integer
/// percentage that immediately follows it (ignoring a leading `%`-adjacent
/// space).
fn parse_percent_after_any_marker(text: &str, markers: &[&str]) -> Option<u8> {
    let lower = text.to_lowercase();
    let mut best: Option<(usize, &str)> = None;
    for marker in markers {
        if let Some(idx) = lower.rfind(marker) {
            if best.is_none_or(|(best_idx, _)| idx > best_idx) {
                best = Some((idx, marker));
            }
        }
    }
    let (idx, marker) = best?;
    let after = lower[idx + marker.len()..].trim_start();
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u8>().ok().map(|p| p.min(100))
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
