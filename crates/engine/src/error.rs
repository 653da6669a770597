// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy surfaced to the application layer.

use fd_adapters::{ApiResponse, CredentialStoreError, TransportError};
use fd_core::{JobId, TransitionError};
use thiserror::Error;

/// Errors from the request pipeline, session and lifecycle operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connect, I/O or timeout failure. Never retried by the pipeline.
    #[error("network error: {0}")]
    Transient(#[from] TransportError),

    /// The session could not be recovered by a refresh; the caller should
    /// send the user back to login.
    #[error("session expired")]
    AuthenticationExpired,

    /// Rejected locally without any network call.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Any other non-2xx response.
    #[error("HTTP {status}")]
    RemoteRejection { status: u16, body: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown job: {0}")]
    UnknownJob(JobId),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

impl ApiError {
    /// True when the UI should force a sign-out and redirect to login.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::AuthenticationExpired)
    }

    /// True when the error can be shown as a message without ending the session.
    pub fn is_recoverable(&self) -> bool {
        !self.is_session_expired()
    }

    /// HTTP status of a remote rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map a final pipeline response onto the error taxonomy.
///
/// A 401/403 reaching this point has already been through the refresh cycle,
/// so it means the session is gone.
pub fn check_status(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else if response.is_auth_failure() {
        Err(ApiError::AuthenticationExpired)
    } else {
        Err(ApiError::RemoteRejection { status: response.status, body: response.body })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
