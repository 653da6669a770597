// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client facade wiring adapters, pipeline, session and lifecycle together.

use crate::config::{ClientConfig, ConfigError};
use crate::lifecycle::JobLifecycle;
use crate::pipeline::{AuthPipeline, SessionEvent};
use crate::session::Session;
use fd_adapters::{
    CredentialStore, FileCredentialStore, HttpTokenRefresher, HttpTransport, ReqwestTransport,
    TokenRefresher,
};
use fd_core::{Clock, SystemClock};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct FleetClient<C: Clock = SystemClock> {
    pipeline: Arc<AuthPipeline>,
    session: Session,
    jobs: JobLifecycle<C>,
}

impl FleetClient<SystemClock> {
    /// Build a client talking to `config.base_url` over HTTP.
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ConfigError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.base_url)?);
        let refresher =
            Arc::new(HttpTokenRefresher::new(Arc::clone(&transport), config.refresh_path.as_str()));
        Ok(Self::with_parts(config, transport, store, refresher, SystemClock))
    }

    /// Client configured from `FD_*` variables, with credentials persisted
    /// under the state directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientConfig::from_env()?;
        let store = Arc::new(FileCredentialStore::in_dir(&config.state_dir));
        tracing::debug!(base_url = %config.base_url, path = %store.path().display(), "client from env");
        Self::new(&config, store)
    }
}

impl<C: Clock> FleetClient<C> {
    /// Wire a client from injected adapters.
    pub fn with_parts(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        clock: C,
    ) -> Self {
        let pipeline = Arc::new(
            AuthPipeline::new(Arc::clone(&transport), store, refresher)
                .with_timeout(config.request_timeout),
        );
        let session = Session::new(Arc::clone(&pipeline), transport, config.login_path.as_str());
        let jobs = JobLifecycle::with_clock(Arc::clone(&pipeline), clock);
        Self { pipeline, session, jobs }
    }

    pub fn pipeline(&self) -> &Arc<AuthPipeline> {
        &self.pipeline
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn jobs(&self) -> &JobLifecycle<C> {
        &self.jobs
    }

    /// Forced sign-out signals, for sending the user back to login.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.pipeline.subscribe()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
