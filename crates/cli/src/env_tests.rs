// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn http_addr_defaults_when_unset() {
    std::env::remove_var("FOREMAN_HTTP_ADDR");
    assert_eq!(http_addr().unwrap().port(), 4505);
}

#[test]
#[serial]
fn http_addr_honors_override() {
    std::env::set_var("FOREMAN_HTTP_ADDR", "127.0.0.1:9999");
    assert_eq!(http_addr().unwrap().port(), 9999);
    std::env::remove_var("FOREMAN_HTTP_ADDR");
}

#[test]
#[serial]
fn daemon_base_url_is_derived_from_http_addr() {
    std::env::set_var("FOREMAN_HTTP_ADDR", "127.0.0.1:4505");
    assert_eq!(daemon_base_url().unwrap(), "http://127.0.0.1:4505");
    std::env::remove_var("FOREMAN_HTTP_ADDR");
}

#[test]
#[serial]
fn state_dir_honors_override() {
    std::env::set_var("FOREMAN_STATE_DIR", "/tmp/foreman-test-state");
    assert_eq!(state_dir(), PathBuf::from("/tmp/foreman-test-state"));
    std::env::remove_var("FOREMAN_STATE_DIR");
}
