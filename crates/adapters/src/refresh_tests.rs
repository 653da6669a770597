// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::http::{FakeTransport, Method};

fn refresher(transport: &FakeTransport) -> HttpTokenRefresher {
    HttpTokenRefresher::new(Arc::new(transport.clone()), "/auth/refresh")
}

#[tokio::test]
async fn posts_device_id_and_refresh_token() {
    let transport = FakeTransport::new();
    transport.respond(200, r#"{"sessionToken":"s2","refreshToken":"r2"}"#);

    let tokens = refresher(&transport).refresh("r1", &DeviceId::new("dev-1")).await.unwrap();
    assert_eq!(
        tokens,
        RefreshedTokens { session_token: "s2".to_string(), refresh_token: Some("r2".to_string()) }
    );

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "/auth/refresh");
    assert_eq!(
        calls[0].body,
        Some(serde_json::json!({ "deviceId": "dev-1", "refreshToken": "r1" }))
    );
    // Refresh is unauthenticated
    assert!(!calls[0].has_header("authorization"));
}

#[tokio::test]
async fn refresh_token_is_optional_in_response() {
    let transport = FakeTransport::new();
    transport.respond(200, r#"{"sessionToken":"s2"}"#);

    let tokens = refresher(&transport).refresh("r1", &DeviceId::new("dev-1")).await.unwrap();
    assert_eq!(tokens.refresh_token, None);
}

#[tokio::test]
async fn non_success_is_rejected() {
    for status in [401, 403, 500] {
        let transport = FakeTransport::new();
        transport.respond(status, "nope");

        let err = refresher(&transport).refresh("r1", &DeviceId::new("dev-1")).await.unwrap_err();
        assert_eq!(err, RefreshError::Rejected { status });
    }
}

#[tokio::test]
async fn transport_failure_is_propagated() {
    let transport = FakeTransport::new();
    transport.fail(TransportError::Connect("refused".to_string()));

    let err = refresher(&transport).refresh("r1", &DeviceId::new("dev-1")).await.unwrap_err();
    assert_eq!(err, RefreshError::Transport(TransportError::Connect("refused".to_string())));
}

#[tokio::test]
async fn empty_or_malformed_body_is_a_decode_error() {
    let transport = FakeTransport::new();
    transport.respond(200, "").respond(200, r#"{"token":"x"}"#);
    let refresher = refresher(&transport);

    for _ in 0..2 {
        let err = refresher.refresh("r1", &DeviceId::new("dev-1")).await.unwrap_err();
        assert!(matches!(err, RefreshError::Decode(_)), "unexpected: {:?}", err);
    }
}

#[tokio::test]
async fn fake_refresher_script_then_default() {
    let fake = FakeTokenRefresher::rejecting(401);
    fake.push(Ok(RefreshedTokens { session_token: "once".to_string(), refresh_token: None }));

    let device = DeviceId::new("dev-1");
    assert_eq!(fake.refresh("r1", &device).await.unwrap().session_token, "once");
    assert_eq!(fake.refresh("r1", &device).await, Err(RefreshError::Rejected { status: 401 }));
    assert_eq!(fake.call_count(), 2);
    assert_eq!(fake.calls()[0], RefreshCall { refresh_token: "r1".to_string(), device_id: device });
}
