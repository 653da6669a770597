// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: credential storage, HTTP, token refresh

pub mod credential;
pub mod http;
pub mod refresh;

pub use credential::{
    CredentialStore, CredentialStoreError, FileCredentialStore, MemoryCredentialStore,
};
pub use http::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport, TransportError};
pub use refresh::{HttpTokenRefresher, RefreshError, RefreshedTokens, TokenRefresher};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use http::{FakeReply, FakeTransport};
#[cfg(any(test, feature = "test-support"))]
pub use refresh::{FakeTokenRefresher, RefreshCall};
