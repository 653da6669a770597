// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A scripted outcome for one request
#[derive(Debug, Clone)]
pub enum FakeReply {
    Respond(ApiResponse),
    Fail(TransportError),
}

type Handler = Arc<dyn Fn(&ApiRequest) -> FakeReply + Send + Sync>;

struct FakeTransportState {
    script: VecDeque<FakeReply>,
    handler: Option<Handler>,
    calls: Vec<ApiRequest>,
    latency: Duration,
}

/// Fake transport for testing.
///
/// Replies come from the script first, then the handler, then default to an
/// empty `200`. Every request is recorded.
#[derive(Clone)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeTransportState>>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeTransportState {
                script: VecDeque::new(),
                handler: None,
                calls: Vec::new(),
                latency: Duration::ZERO,
            })),
        }
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unscripted request.
    pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.inner.lock().script.push_back(FakeReply::Respond(ApiResponse::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.inner.lock().script.push_back(FakeReply::Fail(error));
        self
    }

    /// Answer requests the script does not cover.
    pub fn set_handler(&self, handler: impl Fn(&ApiRequest) -> FakeReply + Send + Sync + 'static) {
        self.inner.lock().handler = Some(Arc::new(handler));
    }

    /// Delay every reply, letting concurrent callers interleave.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = latency;
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Paths of recorded requests, in send order.
    pub fn paths(&self) -> Vec<String> {
        self.inner.lock().calls.iter().map(|c| c.path.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let (reply, latency) = {
            let mut state = self.inner.lock();
            let reply = match state.script.pop_front() {
                Some(reply) => reply,
                None => match &state.handler {
                    Some(handler) => handler(&request),
                    None => FakeReply::Respond(ApiResponse::new(200, "")),
                },
            };
            state.calls.push(request);
            (reply, state.latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match reply {
            FakeReply::Respond(response) => Ok(response),
            FakeReply::Fail(error) => Err(error),
        }
    }
}
