// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sign-in state.
//!
//! The signed-in user is a field on [`Session`], not process-global state.
//! The credential store stays the source of truth: once it is cleared (logout
//! or a failed refresh) the cached user is dropped on the next read.

use crate::error::ApiError;
use crate::pipeline::AuthPipeline;
use fd_adapters::{ApiRequest, CredentialStore, HttpTransport, TransportError};
use fd_core::{Credentials, DeviceId, UserId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The user the current credentials belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    session_token: String,
    refresh_token: String,
    user: SessionUser,
}

pub struct Session {
    pipeline: Arc<AuthPipeline>,
    transport: Arc<dyn HttpTransport>,
    login_path: String,
    user: Mutex<Option<SessionUser>>,
    device_id: Mutex<Option<DeviceId>>,
}

impl Session {
    /// `transport` is used unauthenticated, for the login call only.
    pub fn new(
        pipeline: Arc<AuthPipeline>,
        transport: Arc<dyn HttpTransport>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            transport,
            login_path: login_path.into(),
            user: Mutex::new(None),
            device_id: Mutex::new(None),
        }
    }

    /// Exchange email and password for credentials and store them.
    ///
    /// Bad credentials come back as `RemoteRejection` with the server's
    /// status; they are not a session expiry.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let device_id = self.device_id()?;
        let request = ApiRequest::post(self.login_path.as_str()).json(serde_json::json!({
            "email": email,
            "password": password,
            "deviceId": device_id,
        }));

        let timeout = self.pipeline.timeout();
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| ApiError::Transient(TransportError::Timeout))??;
        if !response.is_success() {
            tracing::warn!(status = response.status, "login rejected");
            return Err(ApiError::RemoteRejection { status: response.status, body: response.body });
        }

        let login: LoginResponse = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?
            .ok_or_else(|| ApiError::Decode("empty login response".to_string()))?;

        self.pipeline.store().set(Credentials::new(
            login.session_token,
            login.refresh_token,
            device_id,
        ))?;
        tracing::info!(user_id = %login.user.id, "signed in");
        *self.user.lock() = Some(login.user.clone());
        Ok(login.user)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.pipeline.store().clear()?;
        *self.user.lock() = None;
        tracing::info!("signed out");
        Ok(())
    }

    pub fn is_signed_in(&self) -> Result<bool, ApiError> {
        Ok(self.pipeline.store().get()?.is_some())
    }

    /// The signed-in user, or `None` once the stored credentials are gone.
    pub fn user(&self) -> Result<Option<SessionUser>, ApiError> {
        let mut user = self.user.lock();
        if self.pipeline.store().get()?.is_none() {
            *user = None;
        }
        Ok(user.clone())
    }

    pub fn user_id(&self) -> Result<Option<UserId>, ApiError> {
        Ok(self.user()?.map(|u| u.id))
    }

    /// Device id for this installation: stored, remembered, or newly generated.
    fn device_id(&self) -> Result<DeviceId, ApiError> {
        let mut cached = self.device_id.lock();
        if let Some(stored) = self.pipeline.store().get()? {
            *cached = Some(stored.device_id);
        }
        let id = cached
            .get_or_insert_with(|| DeviceId::new(uuid::Uuid::new_v4().to_string()))
            .clone();
        Ok(id)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
