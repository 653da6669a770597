// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use proptest::prelude::*;

fn job(status: JobStatus, paused: bool) -> Job {
    Job::builder().status(status).paused(paused).build()
}

#[test]
fn new_job_defaults_to_pending() {
    let job = Job::builder().build();
    assert_eq!(job.status, JobStatus::Pending);
    assert!(!job.paused);
    assert!(!job.is_terminal());
    assert!(!job.is_timer_active());
}

#[yare::parameterized(
    start_from_pending       = { JobStatus::Pending,    false, Transition::Start,    JobStatus::InProgress, false },
    pause_while_running      = { JobStatus::InProgress, false, Transition::Pause,    JobStatus::InProgress, true },
    resume_after_pause       = { JobStatus::InProgress, true,  Transition::Resume,   JobStatus::InProgress, false },
    complete_while_running   = { JobStatus::InProgress, false, Transition::Complete, JobStatus::Completed,  false },
    complete_while_paused    = { JobStatus::InProgress, true,  Transition::Complete, JobStatus::Completed,  false },
    cancel_pending           = { JobStatus::Pending,    false, Transition::Cancel,   JobStatus::Cancelled,  false },
    cancel_paused            = { JobStatus::InProgress, true,  Transition::Cancel,   JobStatus::Cancelled,  false },
)]
fn valid_transitions(
    status: JobStatus,
    paused: bool,
    transition: Transition,
    expected_status: JobStatus,
    expected_paused: bool,
) {
    let before = job(status, paused);
    let after = before.apply(transition).unwrap();
    assert_eq!(after.status, expected_status);
    assert_eq!(after.paused, expected_paused);
    // apply never mutates the original
    assert_eq!(before.status, status);
}

#[yare::parameterized(
    start_in_progress     = { JobStatus::InProgress, false, Transition::Start },
    start_completed       = { JobStatus::Completed,  false, Transition::Start },
    start_cancelled       = { JobStatus::Cancelled,  false, Transition::Start },
    pause_pending         = { JobStatus::Pending,    false, Transition::Pause },
    pause_twice           = { JobStatus::InProgress, true,  Transition::Pause },
    resume_not_paused     = { JobStatus::InProgress, false, Transition::Resume },
    resume_pending        = { JobStatus::Pending,    false, Transition::Resume },
    complete_pending      = { JobStatus::Pending,    false, Transition::Complete },
    complete_completed    = { JobStatus::Completed,  false, Transition::Complete },
    cancel_completed      = { JobStatus::Completed,  false, Transition::Cancel },
    cancel_cancelled      = { JobStatus::Cancelled,  false, Transition::Cancel },
)]
fn invalid_transitions(status: JobStatus, paused: bool, transition: Transition) {
    let job = job(status, paused);
    let err = job.apply(transition).unwrap_err();
    assert_eq!(
        err,
        TransitionError::InvalidTransition { job_id: job.id.clone(), status, paused, transition }
    );
}

#[test]
fn invalid_transition_message() {
    let err = job(JobStatus::InProgress, true).check(Transition::Pause).unwrap_err();
    assert_eq!(err.to_string(), "cannot pause job job-1 while in-progress (paused)");

    let err = job(JobStatus::Pending, false).check(Transition::Complete).unwrap_err();
    assert_eq!(err.to_string(), "cannot complete job job-1 while pending");
}

#[test]
fn timer_active_only_while_running_unpaused() {
    assert!(job(JobStatus::InProgress, false).is_timer_active());
    assert!(!job(JobStatus::InProgress, true).is_timer_active());
    assert!(!job(JobStatus::Completed, false).is_timer_active());
}

#[test]
fn status_serializes_kebab_case() {
    let json = serde_json::to_string(&JobStatus::InProgress).unwrap();
    assert_eq!(json, "\"in-progress\"");
    let parsed: JobStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(parsed, JobStatus::Cancelled);
}

#[test]
fn job_deserializes_from_sparse_server_payload() {
    let job: Job = serde_json::from_str(
        r#"{"id":"job-5","status":"in-progress","isPaused":true,"estimatedCost":120.5}"#,
    )
    .unwrap();
    assert_eq!(job.id, "job-5");
    assert_eq!(job.status, JobStatus::InProgress);
    assert!(job.paused);
    assert_eq!(job.estimated_cost, 120.5);
    assert_eq!(job.actual_cost, None);
    assert_eq!(job.currency, "USD");
    assert_eq!(job.priority, Priority::Medium);
}

#[test]
fn job_round_trips_optional_fields() {
    let job = Job::builder()
        .truck(TruckRef { id: "truck-3".to_string(), name: "Box 3".to_string() })
        .notes("side gate")
        .addresses(vec![Address { label: Some("pickup".to_string()), line: "1 Main St".into() }])
        .build();
    let json = serde_json::to_string(&job).unwrap();
    let parsed: Job = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, job);
}

#[test]
fn transition_verbs() {
    let verbs: Vec<_> = Transition::ALL.iter().map(|t| t.verb()).collect();
    assert_eq!(verbs, ["start", "pause", "resume", "complete", "cancel"]);
}

proptest! {
    #[test]
    fn terminal_states_reject_every_transition(
        status in arb_terminal_status(),
        transition in arb_transition(),
    ) {
        let job = Job::builder().status(status).build();
        prop_assert!(job.apply(transition).is_err());
    }

    #[test]
    fn status_never_moves_backwards(
        start in arb_job_status(),
        paused in any::<bool>(),
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        let mut job = Job::builder().status(start).paused(paused && start == JobStatus::InProgress).build();
        for t in transitions {
            if let Ok(next) = job.apply(t) {
                prop_assert!(rank(next.status) >= rank(job.status));
                prop_assert!(!next.paused || next.status == JobStatus::InProgress);
                job = next;
            }
        }
    }
}

fn rank(status: JobStatus) -> u8 {
    match status {
        JobStatus::Pending => 0,
        JobStatus::InProgress => 1,
        JobStatus::Completed | JobStatus::Cancelled => 2,
    }
}
