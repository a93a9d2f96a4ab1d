//! Heartbeat worker pool
//!
//! This module provides the core heartbeat machinery:
//! - Wire records for the heartbeat endpoint
//! - One send/sleep/retry worker per proxy route
//! - Pool supervision with orderly start/stop

pub mod pool;
pub mod wire;
pub mod worker;

pub use pool::WorkerPool;
pub use wire::{HeartbeatPayload, HeartbeatResponse};
pub use worker::{HeartbeatWorker, WorkerConfig};
