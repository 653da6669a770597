// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session token refresh.
//!
//! The refresh call is an injected capability so the request pipeline can be
//! driven by [`FakeTokenRefresher`] in tests.

use crate::http::{ApiRequest, HttpTransport, TransportError};
use async_trait::async_trait;
use fd_core::DeviceId;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors from refresh operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh rejected: HTTP {status}")]
    Rejected { status: u16 },
    #[error("refresh transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid refresh response: {0}")]
    Decode(String),
}

/// New tokens returned by the refresh endpoint. The refresh token is only
/// present when the server rotates it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    pub session_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Adapter that exchanges a refresh token for a new session token
#[async_trait]
pub trait TokenRefresher: Send + Sync + 'static {
    async fn refresh(
        &self,
        refresh_token: &str,
        device_id: &DeviceId,
    ) -> Result<RefreshedTokens, RefreshError>;
}

/// Refresher that POSTs `{ deviceId, refreshToken }` to the refresh endpoint.
///
/// The call goes straight to the transport, without session credentials.
pub struct HttpTokenRefresher {
    transport: Arc<dyn HttpTransport>,
    path: String,
}

impl HttpTokenRefresher {
    pub fn new(transport: Arc<dyn HttpTransport>, path: impl Into<String>) -> Self {
        Self { transport, path: path.into() }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(
        &self,
        refresh_token: &str,
        device_id: &DeviceId,
    ) -> Result<RefreshedTokens, RefreshError> {
        let request = ApiRequest::post(self.path.as_str()).json(serde_json::json!({
            "deviceId": device_id,
            "refreshToken": refresh_token,
        }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(RefreshError::Rejected { status: response.status });
        }
        response
            .json::<RefreshedTokens>()
            .map_err(|e| RefreshError::Decode(e.to_string()))?
            .ok_or_else(|| RefreshError::Decode("empty body".to_string()))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{RefreshError, RefreshedTokens, TokenRefresher};
    use async_trait::async_trait;
    use fd_core::DeviceId;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded refresh call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RefreshCall {
        pub refresh_token: String,
        pub device_id: DeviceId,
    }

    struct FakeRefreshState {
        script: VecDeque<Result<RefreshedTokens, RefreshError>>,
        default: Result<RefreshedTokens, RefreshError>,
        calls: Vec<RefreshCall>,
        latency: Duration,
    }

    /// Fake refresher for testing.
    ///
    /// Scripted results are used first; afterwards every call gets the default.
    #[derive(Clone)]
    pub struct FakeTokenRefresher {
        inner: Arc<Mutex<FakeRefreshState>>,
    }

    impl Default for FakeTokenRefresher {
        fn default() -> Self {
            Self::succeeding("fresh-session")
        }
    }

    impl FakeTokenRefresher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call returns `session_token` (refresh token not rotated).
        pub fn succeeding(session_token: &str) -> Self {
            Self::with_default(Ok(RefreshedTokens {
                session_token: session_token.to_string(),
                refresh_token: None,
            }))
        }

        /// Every call is rejected with `status`.
        pub fn rejecting(status: u16) -> Self {
            Self::with_default(Err(RefreshError::Rejected { status }))
        }

        fn with_default(default: Result<RefreshedTokens, RefreshError>) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeRefreshState {
                    script: VecDeque::new(),
                    default,
                    calls: Vec::new(),
                    latency: Duration::ZERO,
                })),
            }
        }

        pub fn push(&self, result: Result<RefreshedTokens, RefreshError>) {
            self.inner.lock().script.push_back(result);
        }

        pub fn set_latency(&self, latency: Duration) {
            self.inner.lock().latency = latency;
        }

        pub fn calls(&self) -> Vec<RefreshCall> {
            self.inner.lock().calls.clone()
        }

        pub fn call_count(&self) -> usize {
            self.inner.lock().calls.len()
        }
    }

    #[async_trait]
    impl TokenRefresher for FakeTokenRefresher {
        async fn refresh(
            &self,
            refresh_token: &str,
            device_id: &DeviceId,
        ) -> Result<RefreshedTokens, RefreshError> {
            let (result, latency) = {
                let mut state = self.inner.lock();
                state.calls.push(RefreshCall {
                    refresh_token: refresh_token.to_string(),
                    device_id: device_id.clone(),
                });
                let result = state.script.pop_front().unwrap_or_else(|| state.default.clone());
                (result, state.latency)
            };
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTokenRefresher, RefreshCall};

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
