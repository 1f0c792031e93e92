// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_colorize() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
}

fn clear_color_env() {
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn no_color_env_disables_colorization() {
    std::env::set_var("NO_COLOR", "1");
    assert!(!should_colorize());
    clear_color_env();
}

#[test]
#[serial]
fn color_env_forces_colorization() {
    force_colorize();
    assert!(should_colorize());
    clear_color_env();
}

#[test]
#[serial]
fn status_colorizes_known_variants() {
    force_colorize();
    assert!(status("completed").starts_with("\x1b[32m"));
    assert!(status("failed").starts_with("\x1b[31m"));
    assert!(status("pending").starts_with("\x1b[33m"));
    clear_color_env();
}

#[test]
#[serial]
fn status_leaves_unknown_text_unstyled() {
    force_colorize();
    assert_eq!(status("mystery"), "mystery");
    clear_color_env();
}

#[test]
#[serial]
fn header_and_muted_are_plain_when_uncolorized() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(header("Sessions"), "Sessions");
    assert_eq!(muted("-"), "-");
    clear_color_env();
}
