// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn counts_checked_and_unchecked_items() {
    let doc = "- [x] done\n- [ ] todo\n- [X] also done\n";
    let p = progress_of(doc);
    assert_eq!(p, Progress { total: 3, checked: 2 });
    assert!(!p.is_complete());
}

#[test]
fn all_checked_is_complete() {
    let doc = "- [x] one\n- [X] two\n";
    assert!(progress_of(doc).is_complete());
}

#[test]
fn empty_document_is_not_complete() {
    assert!(!progress_of("").is_complete());
    assert_eq!(progress_of(""), Progress::default());
}

#[test]
fn ignores_non_checkbox_list_items_and_prose() {
    let doc = "# Title\n\nSome prose.\n\n- a plain bullet\n- [x] real item\n";
    assert_eq!(progress_of(doc), Progress { total: 1, checked: 1 });
}

#[test]
fn asterisk_bullets_are_also_recognized() {
    let doc = "* [ ] todo\n* [x] done\n";
    assert_eq!(progress_of(doc), Progress { total: 2, checked: 1 });
}

#[test]
fn missing_file_returns_zero_progress() {
    let p = progress(Path::new("/nonexistent/path/TASKS.md"));
    assert_eq!(p, Progress::default());
}

#[test]
fn reads_from_an_actual_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TASKS.md");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "- [x] one\n- [ ] two").unwrap();
    assert_eq!(progress(&path), Progress { total: 2, checked: 1 });
}
