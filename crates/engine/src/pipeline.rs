// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated request pipeline.
//!
//! One logical call is at most two round trips:
//!
//! ```text
//! attach credentials ─▶ send ─▶ 401/403? ──no──▶ return response
//!                                  │
//!                                 yes
//!                                  ▼
//!                     refresh (shared, once) ─▶ failed ─▶ clear store, signal
//!                                  │                      sign-out, return the
//!                                  │                      original response
//!                                  ▼
//!                     resend with new credentials ─▶ return response as-is
//! ```
//!
//! Concurrent calls that fail with the same stale token share one refresh:
//! the refresh gate is held for the whole cycle, and a caller that finds the
//! stored session token already changed reuses it instead of refreshing again.

use crate::error::{check_status, ApiError};
use fd_adapters::{
    ApiRequest, ApiResponse, CredentialStore, HttpTransport, TokenRefresher, TransportError,
};
use fd_core::Credentials;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const DEVICE_ID_HEADER: &str = "X-Device-Id";

/// Session-wide signals emitted by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were cleared after a failed refresh.
    SignedOut { reason: String },
}

pub struct AuthPipeline {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    refresh_gate: Mutex<()>,
    timeout: Duration,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthPipeline {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            store,
            refresher,
            refresh_gate: Mutex::new(()),
            timeout: crate::env::DEFAULT_REQUEST_TIMEOUT,
            events,
        }
    }

    /// Default bound for one logical call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Execute one logical call with the default timeout.
    ///
    /// Returns the final response whatever its status; use
    /// [`check_status`] or [`AuthPipeline::send_json`] to map it to errors.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.execute_with_timeout(request, self.timeout).await
    }

    /// Execute one logical call bounded by `timeout`.
    ///
    /// On expiry the in-flight request is abandoned and the call fails with a
    /// transient timeout; it is not retried.
    pub async fn execute_with_timeout(
        &self,
        request: ApiRequest,
        timeout: Duration,
    ) -> Result<ApiResponse, ApiError> {
        if request.has_header(AUTHORIZATION_HEADER) {
            return Err(ApiError::InvalidRequest(
                "Authorization header is owned by the pipeline".to_string(),
            ));
        }
        let method = request.method;
        let path = request.path.clone();
        tokio::time::timeout(timeout, self.run(request)).await.map_err(|_| {
            tracing::warn!(%method, %path, ?timeout, "logical call timed out");
            ApiError::Transient(TransportError::Timeout)
        })?
    }

    /// Execute, require a 2xx, and decode the JSON body (empty body is `None`).
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ApiError> {
        let response = check_status(self.execute(request).await?)?;
        response.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn run(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let credentials = self.store.get()?;
        let response = self.send(&request, credentials.as_ref()).await?;
        if !response.is_auth_failure() {
            return Ok(response);
        }

        // Without stored credentials there is nothing to refresh with.
        let Some(used) = credentials else {
            tracing::debug!(path = %request.path, status = response.status, "auth failure while signed out");
            return Ok(response);
        };

        match self.refreshed_credentials(&used).await? {
            Some(fresh) => {
                tracing::debug!(path = %request.path, "retrying with refreshed credentials");
                // Second attempt is returned as-is, 401/403 included.
                self.send(&request, Some(&fresh)).await
            }
            None => Ok(response),
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        credentials: Option<&Credentials>,
    ) -> Result<ApiResponse, ApiError> {
        let mut outbound = request.clone();
        if let Some(credentials) = credentials {
            outbound = outbound
                .header(AUTHORIZATION_HEADER, credentials.bearer())
                .header(DEVICE_ID_HEADER, credentials.device_id.as_str());
        }
        tracing::debug!(method = %outbound.method, path = %outbound.path, "sending request");
        Ok(self.transport.send(outbound).await?)
    }

    /// Credentials to retry with after `used` was rejected, or `None` if the
    /// session cannot be recovered.
    async fn refreshed_credentials(
        &self,
        used: &Credentials,
    ) -> Result<Option<Credentials>, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        match self.store.get()? {
            // A concurrent refresh failed and signed the session out.
            None => return Ok(None),
            // A concurrent caller already refreshed; reuse its result.
            Some(current) if current.session_token != used.session_token => {
                tracing::debug!("credentials already refreshed by a concurrent call");
                return Ok(Some(current));
            }
            Some(_) => {}
        }

        match self.refresher.refresh(&used.refresh_token, &used.device_id).await {
            Ok(tokens) => {
                let fresh = used.rotated(tokens.session_token, tokens.refresh_token);
                if self.store.replace_if_current(&used.session_token, fresh.clone())? {
                    tracing::info!(device_id = %used.device_id, "session refreshed");
                    Ok(Some(fresh))
                } else {
                    // Store changed underneath us (login or logout); trust it.
                    Ok(self.store.get()?)
                }
            }
            Err(e) => {
                if self.store.clear_if_current(&used.session_token)? {
                    tracing::warn!(error = %e, "session refresh failed, signing out");
                    let _ = self.events.send(SessionEvent::SignedOut { reason: e.to_string() });
                    Ok(None)
                } else {
                    // A login landed while the refresh was in flight; keep it.
                    tracing::debug!(error = %e, "refresh failed for replaced credentials");
                    Ok(self.store.get()?)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
