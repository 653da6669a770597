// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Billing actions on tracked jobs.
//!
//! Invoices, payments and refunds change the monetary fields of a job, so
//! they share the job's lock with lifecycle transitions and are committed
//! only after the server confirms. Payment status is never stored; views are
//! derived on every read.

use crate::error::ApiError;
use crate::lifecycle::JobLifecycle;
use fd_adapters::ApiRequest;
use fd_core::{BillingView, Clock, JobId, PaymentStatus};

fn positive(amount: f64) -> Result<f64, ApiError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ApiError::InvalidRequest(format!("amount must be positive, got {}", amount)))
    }
}

impl<C: Clock> JobLifecycle<C> {
    /// Invoice the job for `amount`, which becomes its estimated cost.
    pub async fn create_invoice(&self, id: &JobId, amount: f64) -> Result<BillingView, ApiError> {
        let amount = positive(amount)?;
        let job = self
            .confirmed_update(id, None, |job| {
                let request = ApiRequest::post(format!("/jobs/{}/invoices", job.id))
                    .json(serde_json::json!({ "amount": amount, "currency": job.currency }));
                let mut next = job.clone();
                next.estimated_cost = amount;
                Ok((request, next))
            })
            .await?;
        tracing::info!(job_id = %id, amount, "invoice created");
        Ok(job.billing())
    }

    /// Record a payment of `amount` against the job.
    pub async fn record_payment(&self, id: &JobId, amount: f64) -> Result<BillingView, ApiError> {
        let amount = positive(amount)?;
        let job = self
            .confirmed_update(id, None, |job| {
                let request = ApiRequest::post(format!("/jobs/{}/payments", job.id))
                    .json(serde_json::json!({ "amount": amount }));
                let mut next = job.clone();
                next.actual_cost = Some(job.actual_cost.unwrap_or(0.0) + amount);
                Ok((request, next))
            })
            .await?;
        tracing::info!(job_id = %id, amount, status = %job.payment_status(), "payment recorded");
        Ok(job.billing())
    }

    /// Refund `amount`; the amount paid never drops below zero.
    pub async fn refund(&self, id: &JobId, amount: f64) -> Result<BillingView, ApiError> {
        let amount = positive(amount)?;
        let job = self
            .confirmed_update(id, None, |job| {
                let request = ApiRequest::post(format!("/jobs/{}/refunds", job.id))
                    .json(serde_json::json!({ "amount": amount }));
                let mut next = job.clone();
                next.actual_cost = Some((job.actual_cost.unwrap_or(0.0) - amount).max(0.0));
                Ok((request, next))
            })
            .await?;
        tracing::info!(job_id = %id, amount, status = %job.payment_status(), "refund recorded");
        Ok(job.billing())
    }

    pub fn billing_view(&self, id: &JobId) -> Option<BillingView> {
        self.get(id).map(|job| job.billing())
    }

    /// Billing views of tracked jobs, optionally filtered by payment status.
    pub fn billing_list(&self, filter: Option<PaymentStatus>) -> Vec<BillingView> {
        self.jobs()
            .iter()
            .map(|job| job.billing())
            .filter(|view| filter.map_or(true, |status| view.payment_status == status))
            .collect()
    }
}

#[cfg(test)]
#[path = "billing_tests.rs"]
mod tests;
