// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fd-engine: authenticated requests, session, and confirmed job updates

mod billing;
pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod session;

pub use client::FleetClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{check_status, ApiError};
pub use lifecycle::JobLifecycle;
pub use pipeline::{AuthPipeline, SessionEvent, AUTHORIZATION_HEADER, DEVICE_ID_HEADER};
pub use session::{Session, SessionUser};
