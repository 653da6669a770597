// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Credentials, Job, JobStatus};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for the job state machine.
pub mod strategies {
    use crate::job::{JobStatus, Transition};
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Pending),
            Just(JobStatus::InProgress),
            Just(JobStatus::Completed),
            Just(JobStatus::Cancelled),
        ]
    }

    pub fn arb_terminal_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![Just(JobStatus::Completed), Just(JobStatus::Cancelled)]
    }

    pub fn arb_transition() -> impl Strategy<Value = Transition> {
        proptest::sample::select(Transition::ALL.to_vec())
    }
}

// ── Factory functions ───────────────────────────────────────────────────

pub fn pending_job(id: &str) -> Job {
    Job::builder().id(id).build()
}

pub fn running_job(id: &str) -> Job {
    Job::builder().id(id).status(JobStatus::InProgress).build()
}

pub fn test_credentials(session_token: &str) -> Credentials {
    Credentials::new(session_token, "refresh-1", "device-1")
}
