// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle controller.
//!
//! Every mutation of a tracked job follows the same order: take the job's
//! lock, validate locally, ask the server, and commit only what the server
//! confirmed. A failed or rejected call leaves the local job untouched.
//!
//! The per-job lock is a FIFO `tokio::sync::Mutex`, so operations on one job
//! run in submission order while different jobs proceed independently.

use crate::error::{check_status, ApiError};
use crate::pipeline::AuthPipeline;
use fd_adapters::{ApiRequest, ApiResponse};
use fd_core::{Clock, Job, JobId, SystemClock, Transition, TransitionRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct JobEntry {
    job: Job,
    history: Vec<TransitionRecord>,
}

/// Tracks jobs and drives their server-confirmed state changes
pub struct JobLifecycle<C: Clock = SystemClock> {
    pipeline: Arc<AuthPipeline>,
    clock: C,
    entries: Mutex<HashMap<JobId, JobEntry>>,
    locks: Mutex<HashMap<JobId, Arc<tokio::sync::Mutex<()>>>>,
}

impl JobLifecycle<SystemClock> {
    pub fn new(pipeline: Arc<AuthPipeline>) -> Self {
        Self::with_clock(pipeline, SystemClock)
    }
}

impl<C: Clock> JobLifecycle<C> {
    pub fn with_clock(pipeline: Arc<AuthPipeline>, clock: C) -> Self {
        Self {
            pipeline,
            clock,
            entries: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start tracking `job`, replacing any tracked copy. History is kept.
    pub fn track(&self, job: Job) {
        let mut entries = self.entries.lock();
        match entries.get_mut(&job.id) {
            Some(entry) => entry.job = job,
            None => {
                entries.insert(job.id.clone(), JobEntry { job, history: Vec::new() });
            }
        }
    }

    pub fn untrack(&self, id: &JobId) -> Option<Job> {
        let removed = self.entries.lock().remove(id).map(|entry| entry.job);
        let mut locks = self.locks.lock();
        // An in-flight operation still holds a clone; keep its lock in place.
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }
        removed
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.entries.lock().get(id).map(|entry| entry.job.clone())
    }

    /// All tracked jobs, ordered by id.
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.entries.lock().values().map(|e| e.job.clone()).collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    /// Server-confirmed transitions of `id`, oldest first.
    pub fn history(&self, id: &JobId) -> Vec<TransitionRecord> {
        self.entries.lock().get(id).map(|entry| entry.history.clone()).unwrap_or_default()
    }

    /// Load `id` from the server and track it.
    pub async fn fetch(&self, id: &JobId) -> Result<Job, ApiError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let job: Job = self
            .pipeline
            .send_json(ApiRequest::get(format!("/jobs/{}", id)))
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty body for job {}", id)))?;
        if job.id != *id {
            return Err(ApiError::Decode(format!("requested job {} but got {}", id, job.id)));
        }
        self.track(job.clone());
        Ok(job)
    }

    pub async fn start(&self, id: &JobId) -> Result<Job, ApiError> {
        self.transition(id, Transition::Start).await
    }

    pub async fn pause(&self, id: &JobId) -> Result<Job, ApiError> {
        self.transition(id, Transition::Pause).await
    }

    pub async fn resume(&self, id: &JobId) -> Result<Job, ApiError> {
        self.transition(id, Transition::Resume).await
    }

    pub async fn complete(&self, id: &JobId) -> Result<Job, ApiError> {
        self.transition(id, Transition::Complete).await
    }

    pub async fn cancel(&self, id: &JobId) -> Result<Job, ApiError> {
        self.transition(id, Transition::Cancel).await
    }

    /// Apply `transition` once the server confirms it.
    ///
    /// An invalid transition is rejected without any network call. There is
    /// no automatic retry on failure.
    pub async fn transition(&self, id: &JobId, transition: Transition) -> Result<Job, ApiError> {
        self.confirmed_update(id, Some(transition), |job| {
            let next = job.apply(transition)?;
            let request = ApiRequest::post(format!("/jobs/{}/{}", job.id, transition.verb()));
            Ok((request, next))
        })
        .await
    }

    /// Run one confirm-then-commit cycle under the job's lock.
    ///
    /// `plan` sees the current job and returns the request to send plus the
    /// job as it should look if the server accepts. A full job resource in the
    /// success body with the planned id, status and pause flag takes
    /// precedence over the planned one.
    pub(crate) async fn confirmed_update<F>(
        &self,
        id: &JobId,
        transition: Option<Transition>,
        plan: F,
    ) -> Result<Job, ApiError>
    where
        F: FnOnce(&Job) -> Result<(ApiRequest, Job), ApiError>,
    {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let current = self.get(id).ok_or_else(|| ApiError::UnknownJob(id.clone()))?;
        let (request, planned) = plan(&current)?;
        let path = request.path.clone();

        let response = match self.pipeline.execute(request).await.and_then(check_status) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(job_id = %id, %path, error = %e, "job update not confirmed");
                return Err(e);
            }
        };

        let confirmed = match server_job(&response, &planned) {
            Some(server) => server,
            None => {
                tracing::debug!(job_id = %id, "response is not a matching job, using local result");
                planned
            }
        };

        let at_ms = self.clock.epoch_ms();
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(id) else {
            // Untracked while the call was in flight; stay untracked.
            tracing::debug!(job_id = %id, "job untracked before confirmation, not committing");
            return Ok(confirmed);
        };
        entry.job = confirmed.clone();
        if let Some(transition) = transition {
            entry.history.push(TransitionRecord { transition, at_ms });
            tracing::info!(
                job_id = %id,
                %transition,
                status = %confirmed.status,
                paused = confirmed.paused,
                "transition confirmed"
            );
        }
        Ok(confirmed)
    }

    fn lock_for(&self, id: &JobId) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().entry(id.clone()).or_default().clone()
    }
}

/// Fields a body must carry to count as a full job resource. Everything else
/// in [`Job`] has a serde default, so a bare acknowledgment would otherwise
/// decode as a blank job.
const JOB_RESOURCE_FIELDS: [&str; 3] = ["id", "status", "estimatedCost"];

/// The job resource in a success body, if it is one and agrees with the
/// state the operation was expected to produce.
fn server_job(response: &ApiResponse, planned: &Job) -> Option<Job> {
    let value = response.json::<serde_json::Value>().ok()??;
    let object = value.as_object()?;
    if !JOB_RESOURCE_FIELDS.iter().all(|field| object.contains_key(*field)) {
        return None;
    }
    let job: Job = serde_json::from_value(value).ok()?;
    (job.id == planned.id && job.status == planned.status && job.paused == planned.paused)
        .then_some(job)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
