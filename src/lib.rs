//! Pulse - Proxy-Routed Heartbeat Worker Pool
//!
//! Maintains a fleet of independent network presences: for each configured
//! outbound proxy, one worker sends periodic heartbeats to a remote endpoint
//! over its own route, honoring the server-dictated interval and recovering
//! from transient failures with a fixed backoff.
//!
//! ## Features
//!
//! - HTTP, HTTPS, SOCKS4, and SOCKS5 proxy support with optional credentials
//! - Remote DNS resolution through SOCKS tunnels (no local DNS leakage)
//! - One independently scheduled worker per proxy, forever-retrying
//! - Cooperative pool-wide shutdown with no dangling workers

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod proxy;

pub use config::Config;
pub use error::{PulseError, Result};
pub use heartbeat::{HeartbeatWorker, WorkerConfig, WorkerPool};
pub use proxy::{ProxyScheme, ProxySpec, Route};
