// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and lifecycle state machine.
//!
//! ```text
//!            start            complete
//!  pending ────────▶ in-progress ────────▶ completed
//!     │               │    ▲
//!     │         pause │    │ resume
//!     │               ▼    │
//!     │            (paused flag)
//!     │
//!     └──── cancel (from any non-terminal state) ────▶ cancelled
//! ```
//!
//! Pausing keeps `status == InProgress` and only toggles [`Job::paused`],
//! which stops billing-time accrual on the remote side.

use crate::billing::{BillingView, PaymentStatus};
use crate::id::JobId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client-visible job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// No transition is permitted out of a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

crate::wire_names! {
    JobStatus {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

crate::wire_names! {
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

/// Caller-invoked lifecycle change. Each maps to a remote verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Complete,
    Cancel,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::Start,
        Transition::Pause,
        Transition::Resume,
        Transition::Complete,
        Transition::Cancel,
    ];

    /// Path segment of the remote endpoint (`/jobs/{id}/{verb}`).
    pub fn verb(self) -> &'static str {
        self.as_str()
    }
}

crate::wire_names! {
    Transition {
        Start => "start",
        Pause => "pause",
        Resume => "resume",
        Complete => "complete",
        Cancel => "cancel",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {transition} job {job_id} while {}", describe_state(.status, .paused))]
    InvalidTransition { job_id: JobId, status: JobStatus, paused: bool, transition: Transition },
}

fn describe_state(status: &JobStatus, paused: &bool) -> String {
    if *paused {
        format!("{} (paused)", status)
    } else {
        status.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub line: String,
}

/// Scheduled window, epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A scheduled unit of work.
///
/// `status` and `paused` are only changed through [`Job::apply`], which the
/// lifecycle controller calls after the server has confirmed the transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, alias = "isPaused")]
    pub paused: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub client: ClientRef,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub window: TimeWindow,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<TruckRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

crate::builder! {
    pub struct JobBuilder => Job {
        required {
            id: JobId = JobId::new("job-1"),
            status: JobStatus = JobStatus::Pending,
            paused: bool = false,
            priority: Priority = Priority::Medium,
            client: ClientRef = ClientRef { name: "Test Client".to_string(), ..ClientRef::default() },
            addresses: Vec<Address> = Vec::new(),
            window: TimeWindow = TimeWindow::default(),
            estimated_cost: f64 = 500.0,
            currency: String = default_currency(),
        }
        optional {
            actual_cost: f64,
            truck: TruckRef,
            notes: String,
        }
    }
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True while billing time accrues remotely.
    pub fn is_timer_active(&self) -> bool {
        self.status == JobStatus::InProgress && !self.paused
    }

    /// Check whether `transition` is permitted from the current state.
    pub fn check(&self, transition: Transition) -> Result<(), TransitionError> {
        let allowed = match transition {
            Transition::Start => self.status == JobStatus::Pending,
            Transition::Pause => self.status == JobStatus::InProgress && !self.paused,
            Transition::Resume => self.status == JobStatus::InProgress && self.paused,
            Transition::Complete => self.status == JobStatus::InProgress,
            Transition::Cancel => !self.status.is_terminal(),
        };
        if allowed {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                job_id: self.id.clone(),
                status: self.status,
                paused: self.paused,
                transition,
            })
        }
    }

    /// Return the job as it looks after `transition`, without mutating `self`.
    pub fn apply(&self, transition: Transition) -> Result<Job, TransitionError> {
        self.check(transition)?;
        let mut next = self.clone();
        match transition {
            Transition::Start => next.status = JobStatus::InProgress,
            Transition::Pause => next.paused = true,
            Transition::Resume => next.paused = false,
            Transition::Complete => {
                next.status = JobStatus::Completed;
                next.paused = false;
            }
            Transition::Cancel => {
                next.status = JobStatus::Cancelled;
                next.paused = false;
            }
        }
        Ok(next)
    }

    /// Derived on every call; there is no stored payment status.
    pub fn payment_status(&self) -> PaymentStatus {
        crate::billing::derive_payment_status(self.actual_cost, self.estimated_cost)
    }

    pub fn billing(&self) -> BillingView {
        BillingView::of(self)
    }
}

/// A server-confirmed transition, kept as per-job history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    pub transition: Transition,
    pub at_ms: u64,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
