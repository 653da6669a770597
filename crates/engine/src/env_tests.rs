// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

/// Run `f` with the given variables set (or removed), restoring them afterwards.
fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, std::env::var(k).ok())).collect();
    for (key, value) in vars {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
}

#[test]
#[serial]
fn api_url_defaults_when_unset_or_empty() {
    with_env(&[("FD_API_URL", None)], || assert_eq!(api_url(), DEFAULT_API_URL));
    with_env(&[("FD_API_URL", Some(""))], || assert_eq!(api_url(), DEFAULT_API_URL));
    with_env(&[("FD_API_URL", Some("https://api.example.com"))], || {
        assert_eq!(api_url(), "https://api.example.com")
    });
}

#[test]
#[serial]
fn request_timeout_parses_millis() {
    with_env(&[("FD_REQUEST_TIMEOUT_MS", Some("1500"))], || {
        assert_eq!(request_timeout(), Duration::from_millis(1500))
    });
    with_env(&[("FD_REQUEST_TIMEOUT_MS", Some("soon"))], || {
        assert_eq!(request_timeout(), DEFAULT_REQUEST_TIMEOUT)
    });
    with_env(&[("FD_REQUEST_TIMEOUT_MS", Some("0"))], || {
        assert_eq!(request_timeout(), DEFAULT_REQUEST_TIMEOUT)
    });
}

#[test]
#[serial]
fn state_dir_precedence() {
    with_env(
        &[("FD_STATE_DIR", Some("/tmp/fd")), ("XDG_STATE_HOME", Some("/tmp/xdg"))],
        || assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/fd")),
    );
    with_env(&[("FD_STATE_DIR", None), ("XDG_STATE_HOME", Some("/tmp/xdg"))], || {
        assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/fleetdesk"))
    });
    with_env(
        &[("FD_STATE_DIR", None), ("XDG_STATE_HOME", None), ("HOME", Some("/home/dispatch"))],
        || assert_eq!(state_dir().unwrap(), PathBuf::from("/home/dispatch/.local/state/fleetdesk")),
    );
    with_env(&[("FD_STATE_DIR", None), ("XDG_STATE_HOME", None), ("HOME", None)], || {
        assert!(matches!(state_dir(), Err(ConfigError::NoStateDir)))
    });
}
