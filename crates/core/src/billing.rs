// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payment status derivation for billing views.
//!
//! Payment status is never stored; it is a pure function of a job's
//! actual and estimated cost and is recomputed on every read.

use crate::id::JobId;
use crate::job::Job;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

crate::wire_names! {
    PaymentStatus {
        Unpaid => "unpaid",
        Partial => "partial",
        Paid => "paid",
    }
}

/// Classify a job's payment state.
///
/// Absent, zero or negative `actual_cost` is unpaid. Otherwise anything short
/// of `estimated_cost` is partial and the rest is paid, so a job with no
/// estimate and any payment counts as paid.
pub fn derive_payment_status(actual_cost: Option<f64>, estimated_cost: f64) -> PaymentStatus {
    match actual_cost {
        None => PaymentStatus::Unpaid,
        Some(actual) if actual <= 0.0 || actual.is_nan() => PaymentStatus::Unpaid,
        Some(actual) if actual < estimated_cost => PaymentStatus::Partial,
        Some(_) => PaymentStatus::Paid,
    }
}

/// Billing projection of a job, built on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingView {
    pub job_id: JobId,
    pub estimated_cost: f64,
    pub actual_cost: Option<f64>,
    pub payment_status: PaymentStatus,
    pub currency: String,
}

impl BillingView {
    pub fn of(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            estimated_cost: job.estimated_cost,
            actual_cost: job.actual_cost,
            payment_status: derive_payment_status(job.actual_cost, job.estimated_cost),
            currency: job.currency.clone(),
        }
    }

    /// Amount still owed, never negative.
    pub fn outstanding(&self) -> f64 {
        (self.estimated_cost - self.actual_cost.unwrap_or(0.0)).max(0.0)
    }
}

#[cfg(test)]
#[path = "billing_tests.rs"]
mod tests;
