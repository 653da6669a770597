// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session credentials.

use crate::id::DeviceId;
use serde::{Deserialize, Serialize};

/// Credentials for the signed-in session.
///
/// Created at login, rotated on refresh, destroyed on logout or when a
/// refresh is rejected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub session_token: String,
    pub refresh_token: String,
    pub device_id: DeviceId,
}

impl Credentials {
    pub fn new(
        session_token: impl Into<String>,
        refresh_token: impl Into<String>,
        device_id: impl Into<DeviceId>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            refresh_token: refresh_token.into(),
            device_id: device_id.into(),
        }
    }

    /// Credentials after a successful refresh. The refresh token is kept
    /// when the server does not rotate it.
    pub fn rotated(&self, session_token: String, refresh_token: Option<String>) -> Self {
        Self {
            session_token,
            refresh_token: refresh_token.unwrap_or_else(|| self.refresh_token.clone()),
            device_id: self.device_id.clone(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.session_token)
    }
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("session_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("device_id", &self.device_id)
            .finish()
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
