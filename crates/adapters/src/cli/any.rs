// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatches to one of the concrete CLI adapters by `CliKind`, so the
//! Session Manager can resolve "per-task override or global default"
//! (§4.6 step 1) to a single concrete, `Clone`-able type instead of holding
//! one generic type parameter per possible CLI.

use super::{ClaudeCliAdapter, CliAdapter, CodexCliAdapter, GeminiCliAdapter, ResumeContext, StartupDialog};
use foreman_core::CliKind;
use std::path::Path;

#[derive(Clone, Copy, Debug)]
pub enum AnyCliAdapter {
    Claude(ClaudeCliAdapter),
    Codex(CodexCliAdapter),
    Gemini(GeminiCliAdapter),
}

impl AnyCliAdapter {
    pub fn for_kind(kind: CliKind) -> Self {
        match kind {
            CliKind::Claude => AnyCliAdapter::Claude(ClaudeCliAdapter::new()),
            CliKind::Codex => AnyCliAdapter::Codex(CodexCliAdapter::new()),
            CliKind::Gemini => AnyCliAdapter::Gemini(GeminiCliAdapter::new()),
        }
    }
}

impl CliAdapter for AnyCliAdapter {
    fn kind(&self) -> CliKind {
        match self {
            AnyCliAdapter::Claude(a) => a.kind(),
            AnyCliAdapter::Codex(a) => a.kind(),
            AnyCliAdapter::Gemini(a) => a.kind(),
        }
    }

    fn launch_command(&self, directory: &Path, prompt_file: &Path, dangerous: bool) -> Vec<String> {
        match self {
            AnyCliAdapter::Claude(a) => a.launch_command(directory, prompt_file, dangerous),
            AnyCliAdapter::Codex(a) => a.launch_command(directory, prompt_file, dangerous),
            AnyCliAdapter::Gemini(a) => a.launch_command(directory, prompt_file, dangerous),
        }
    }

    fn parse_context_remaining(&self, output_chunk: &str) -> Option<u8> {
        match self {
            AnyCliAdapter::Claude(a) => a.parse_context_remaining(output_chunk),
            AnyCliAdapter::Codex(a) => a.parse_context_remaining(output_chunk),
            AnyCliAdapter::Gemini(a) => a.parse_context_remaining(output_chunk),
        }
    }

    fn idle_signature(&self, output_tail: &str) -> bool {
        match self {
            AnyCliAdapter::Claude(a) => a.idle_signature(output_tail),
            AnyCliAdapter::Codex(a) => a.idle_signature(output_tail),
            AnyCliAdapter::Gemini(a) => a.idle_signature(output_tail),
        }
    }

    fn resume_prompt(&self, ctx: &ResumeContext<'_>) -> String {
        match self {
            AnyCliAdapter::Claude(a) => a.resume_prompt(ctx),
            AnyCliAdapter::Codex(a) => a.resume_prompt(ctx),
            AnyCliAdapter::Gemini(a) => a.resume_prompt(ctx),
        }
    }

    fn detect_startup_dialog(&self, output_tail: &str) -> Option<StartupDialog> {
        match self {
            AnyCliAdapter::Claude(a) => a.detect_startup_dialog(output_tail),
            AnyCliAdapter::Codex(a) => a.detect_startup_dialog(output_tail),
            AnyCliAdapter::Gemini(a) => a.detect_startup_dialog(output_tail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_kind_resolves_to_the_matching_variant() {
        assert_eq!(AnyCliAdapter::for_kind(CliKind::Codex).kind(), CliKind::Codex);
        assert_eq!(AnyCliAdapter::for_kind(CliKind::Gemini).kind(), CliKind::Gemini);
    }

    #[test]
    fn detect_startup_dialog_dispatches_to_the_inner_adapter() {
        let adapter = AnyCliAdapter::for_kind(CliKind::Codex);
        assert_eq!(
            adapter.detect_startup_dialog("Continue in this folder?"),
            Some(StartupDialog::Clearable("y"))
        );
    }
}
