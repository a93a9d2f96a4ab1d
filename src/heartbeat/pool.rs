//! Worker pool supervision
//!
//! Launches one heartbeat worker per valid proxy entry and drives orderly
//! shutdown of the whole fleet.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{PulseError, Result};
use crate::heartbeat::worker::{HeartbeatWorker, WorkerConfig};
use crate::proxy::{ProxySpec, Route};

/// Supervisor for the heartbeat worker fleet
///
/// Owns the pool-wide shutdown signal and a handle for every launched
/// worker; workers are never detached untracked.
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Launch one worker per valid proxy entry
    ///
    /// Malformed entries are logged and skipped; a single bad line never
    /// aborts the pool. Zero valid entries is a startup failure.
    pub fn start(
        entries: &[String],
        credentials: Arc<Credentials>,
        config: WorkerConfig,
    ) -> Result<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        let mut workers = Vec::new();

        for raw in entries {
            let spec = match ProxySpec::parse(raw) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!("Skipping proxy entry: {}", e);
                    continue;
                }
            };

            let route = match Route::build(&spec) {
                Ok(route) => route,
                Err(e) => {
                    warn!("Skipping proxy {}: {}", spec.label(), e);
                    continue;
                }
            };

            let worker =
                match HeartbeatWorker::new(spec.clone(), &route, credentials.clone(), config.clone())
                {
                    Ok(worker) => worker,
                    Err(e) => {
                        warn!("Skipping proxy {}: {}", spec.label(), e);
                        continue;
                    }
                };

            let shutdown_rx = shutdown_tx.subscribe();
            workers.push(tokio::spawn(async move {
                worker.run(shutdown_rx).await;
            }));
        }

        if workers.is_empty() {
            return Err(PulseError::EmptyProxyList);
        }

        info!("Started {} heartbeat workers", workers.len());

        Ok(Self {
            shutdown_tx,
            workers,
        })
    }

    /// Number of launched worker tasks
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Signal every worker to stop and wait for all of them to exit
    ///
    /// Returns only after the last worker has observed the signal and
    /// finished; no requests are issued after this returns.
    pub async fn stop(self) {
        info!("Stopping {} heartbeat workers", self.workers.len());
        let _ = self.shutdown_tx.send(true);

        for handle in self.workers {
            let _ = handle.await;
        }

        info!("All heartbeat workers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Arc<Credentials> {
        Arc::new(Credentials {
            token: "test-token".to_string(),
            uid: "acct-1".to_string(),
        })
    }

    fn test_config() -> WorkerConfig {
        let mut config =
            WorkerConfig::new(Url::parse("http://heartbeat.internal/api/network/ping").unwrap());
        config.request_timeout = Duration::from_secs(5);
        config
    }

    async fn long_interval_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "data": {"interval": 60}})),
            )
            .mount(&server)
            .await;
        server
    }

    fn proxy_entry(server: &MockServer) -> String {
        let addr = server.address();
        format!("{}:{}", addr.ip(), addr.port())
    }

    #[tokio::test]
    async fn test_start_skips_malformed_entries() {
        let server = long_interval_server().await;
        let entry = proxy_entry(&server);

        let entries = vec![
            entry.clone(),
            "definitely-not-a-proxy".to_string(),
            format!("{}@alice:pw", entry),
        ];

        let pool = WorkerPool::start(&entries, test_credentials(), test_config()).unwrap();
        assert_eq!(pool.worker_count(), 2);

        pool.stop().await;
    }

    #[tokio::test]
    async fn test_start_with_no_valid_entries_fails() {
        let entries = vec!["bad".to_string(), "also:bad".to_string()];
        let result = WorkerPool::start(&entries, test_credentials(), test_config());
        assert!(matches!(result, Err(PulseError::EmptyProxyList)));

        let result = WorkerPool::start(&[], test_credentials(), test_config());
        assert!(matches!(result, Err(PulseError::EmptyProxyList)));
    }

    #[tokio::test]
    async fn test_stop_joins_all_workers_and_halts_traffic() {
        let server = long_interval_server().await;
        let entry = proxy_entry(&server);
        let entries = vec![entry.clone(), format!("{}@alice:pw", entry)];

        let pool = WorkerPool::start(&entries, test_credentials(), test_config()).unwrap();
        assert_eq!(pool.worker_count(), 2);

        // Let both workers get their first tick out.
        tokio::time::sleep(Duration::from_millis(200)).await;
        pool.stop().await;

        let after_stop = server.received_requests().await.unwrap().len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        let later = server.received_requests().await.unwrap().len();

        assert_eq!(after_stop, later, "no requests may be issued after stop()");
    }
}
