// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fd_core::test_support::pending_job;
use fd_core::Transition;

#[yare::parameterized(
    ok         = { 200 },
    created    = { 201 },
    no_content = { 204 },
)]
fn success_passes_through(status: u16) {
    let response = ApiResponse::new(status, "body");
    assert_eq!(check_status(response.clone()).unwrap(), response);
}

#[yare::parameterized(
    unauthorized = { 401 },
    forbidden    = { 403 },
)]
fn auth_failure_is_session_expired(status: u16) {
    let err = check_status(ApiResponse::new(status, "")).unwrap_err();
    assert!(err.is_session_expired());
    assert!(!err.is_recoverable());
}

#[test]
fn other_failures_keep_status_and_body() {
    let err = check_status(ApiResponse::new(500, "boom")).unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
    assert_eq!(err.status(), Some(500));
    assert!(err.is_recoverable());
    match err {
        ApiError::RemoteRejection { body, .. } => assert_eq!(body, "boom"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn invalid_transition_is_recoverable() {
    let transition_err = pending_job("job-1").check(Transition::Complete).unwrap_err();
    let err = ApiError::from(transition_err);
    assert!(err.is_recoverable());
    assert_eq!(err.to_string(), "cannot complete job job-1 while pending");
}

#[test]
fn transient_error_message() {
    let err = ApiError::from(TransportError::Timeout);
    assert_eq!(err.to_string(), "network error: request timed out");
    assert_eq!(err.status(), None);
}
