// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fd-core: domain types for the fleetdesk client core

pub mod macros;

pub mod billing;
pub mod clock;
pub mod credentials;
pub mod id;
pub mod job;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use billing::{derive_payment_status, BillingView, PaymentStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use credentials::Credentials;
pub use id::{DeviceId, JobId, UserId};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{
    Address, ClientRef, Job, JobStatus, Priority, TimeWindow, Transition, TransitionError,
    TransitionRecord, TruckRef,
};
