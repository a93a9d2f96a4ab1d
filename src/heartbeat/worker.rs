//! Heartbeat worker
//!
//! Each worker owns one proxy route and runs an unbounded send/sleep/retry
//! loop against the remote endpoint until signaled to stop. Every failure
//! kind maps to the same fixed backoff: the loop is meant to run forever and
//! self-heal once a transient condition clears.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, instrument};
use url::Url;
use uuid::Uuid;

use crate::config::Credentials;
use crate::error::{PulseError, Result};
use crate::heartbeat::wire::{browser_headers, HeartbeatPayload, HeartbeatResponse};
use crate::proxy::{ProxySpec, Route};

/// Heartbeat worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Heartbeat endpoint URL
    pub endpoint: Url,
    /// Bound on each heartbeat request
    pub request_timeout: Duration,
    /// Fixed sleep after a failed tick
    pub error_backoff: Duration,
}

impl WorkerConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: Duration::from_secs(30),
            error_backoff: Duration::from_secs(60),
        }
    }
}

/// Heartbeat worker bound to one proxy route
pub struct HeartbeatWorker {
    spec: ProxySpec,
    client: reqwest::Client,
    identity: String,
    credentials: Arc<Credentials>,
    config: WorkerConfig,
}

impl HeartbeatWorker {
    /// Create a worker for a parsed proxy entry and its route
    pub fn new(
        spec: ProxySpec,
        route: &Route,
        credentials: Arc<Credentials>,
        config: WorkerConfig,
    ) -> Result<Self> {
        let client = route.client(config.request_timeout)?;
        let identity = Self::identity_for(spec.raw()).to_string();

        Ok(Self {
            spec,
            client,
            identity,
            credentials,
            config,
        })
    }

    /// Stable pseudo-random identity for a raw proxy entry
    ///
    /// Derived deterministically so the remote service recognizes the same
    /// proxy's worker across restarts.
    pub fn identity_for(raw_entry: &str) -> Uuid {
        Uuid::new_v3(&Uuid::NAMESPACE_DNS, raw_entry.as_bytes())
    }

    /// Run the heartbeat loop until the shutdown signal is observed
    ///
    /// The signal is polled at the top of every iteration and interrupts the
    /// inter-tick sleep; an in-flight request is never cancelled, it completes
    /// or times out first.
    #[instrument(skip(self, shutdown), fields(proxy = %self.spec.label()))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting heartbeat worker for {}", self.spec.label());

        loop {
            if *shutdown.borrow() {
                break;
            }

            let pause = match self.tick().await {
                Ok(interval) => {
                    info!("Sleeping for {} seconds", interval.as_secs());
                    interval
                }
                Err(e) => {
                    error!("Heartbeat failed - proxy: {} - {}", self.spec.label(), e);
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = sleep(pause) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Heartbeat worker for {} stopped", self.spec.label());
    }

    /// Send one heartbeat and return the server-chosen next interval
    async fn tick(&self) -> Result<Duration> {
        let payload = HeartbeatPayload::new(&self.credentials.uid, &self.identity);

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .headers(browser_headers())
            .bearer_auth(&self.credentials.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PulseError::Remote(format!("unexpected status {}", status)));
        }

        let body = response.text().await?;
        let parsed: HeartbeatResponse = serde_json::from_str(&body)
            .map_err(|e| PulseError::Remote(format!("malformed response body: {}", e)))?;
        let interval = parsed
            .next_interval()
            .ok_or_else(|| PulseError::Remote("response missing data.interval".to_string()))?;

        info!(
            "Heartbeat ok - proxy: {} - response: {}",
            self.spec.label(),
            body.trim()
        );

        Ok(Duration::from_secs(interval))
    }
}
