// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown checkbox inspector (§4.10): a line-oriented scan for `- [ ]` /
//! `- [x]` list items, sufficient for the Watchdog's idle-lockup
//! disambiguation (§4.5). Nested lists, non-checkbox list items, and
//! front-matter are out of scope — this undercounts rather than guesses
//! when a line doesn't match the pattern.

use std::path::Path;

/// Checkbox progress for a Markdown document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub checked: usize,
}

impl Progress {
    /// True when every counted checkbox is checked — the Watchdog's signal
    /// to route an idle session to `completed` rather than `failed`.
    ///
    /// A document with zero checkboxes is not considered complete: an
    /// un-parseable or empty document must not be mistaken for "done".
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.checked == self.total
    }
}

/// Scans `doc_path` for top-level Markdown checkbox list items and counts
/// how many are checked. Returns `{total: 0, checked: 0}` if the file is
/// missing or unreadable.
pub fn progress(doc_path: &Path) -> Progress {
    let content = match std::fs::read_to_string(doc_path) {
        Ok(c) => c,
        Err(_) => return Progress::default(),
    };
    progress_of(&content)
}

fn progress_of(content: &str) -> Progress {
    let mut total = 0;
    let mut checked = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed
            .strip_prefix("- [")
            .or_else(|| trimmed.strip_prefix("* ["))
        else {
            continue;
        };
        let Some(mark_end) = rest.find(']') else {
            continue;
        };
        let mark = &rest[..mark_end];
        if mark.len() != 1 {
            continue;
        }
        total += 1;
        if mark.eq_ignore_ascii_case("x") {
            checked += 1;
        }
    }
    Progress { total, checked }
}

#[cfg(test)]
#[path = "checkbox_tests.rs"]
mod tests;
