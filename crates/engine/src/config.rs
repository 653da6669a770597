// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration

use crate::env;
use fd_adapters::TransportError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory (set FD_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("could not build http transport: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the business API
    pub base_url: String,
    /// Upper bound for one logical call, refresh and retry included
    pub request_timeout: Duration,
    pub login_path: String,
    pub refresh_path: String,
    /// Directory holding persisted credentials
    pub state_dir: PathBuf,
}

impl ClientConfig {
    pub const LOGIN_PATH: &'static str = "/auth/login";
    pub const REFRESH_PATH: &'static str = "/auth/refresh";

    pub fn new(base_url: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: env::DEFAULT_REQUEST_TIMEOUT,
            login_path: Self::LOGIN_PATH.to_string(),
            refresh_path: Self::REFRESH_PATH.to_string(),
            state_dir: state_dir.into(),
        }
    }

    /// Load configuration from `FD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env::api_url(), env::state_dir()?).request_timeout(env::request_timeout()))
    }

    fd_core::setters! {
        base_url: String,
        login_path: String,
        refresh_path: String,
        state_dir: PathBuf,
        request_timeout: Duration,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
