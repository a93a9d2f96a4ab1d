//! Wire records for the heartbeat endpoint

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use serde::{Deserialize, Serialize};

/// Protocol version reported in every heartbeat
pub const PROTOCOL_VERSION: &str = "1.0.0";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0";
const APP_ORIGIN: &str = "https://app.aigaea.net";
const APP_REFERER: &str = "https://app.aigaea.net/";

/// Heartbeat request body, constructed fresh each tick
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatPayload {
    pub uid: String,
    pub browser_id: String,
    pub timestamp: i64,
    pub version: &'static str,
}

impl HeartbeatPayload {
    pub fn new(uid: &str, browser_id: &str) -> Self {
        Self {
            uid: uid.to_string(),
            browser_id: browser_id.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            version: PROTOCOL_VERSION,
        }
    }
}

/// Heartbeat response body
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<HeartbeatData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatData {
    /// Seconds the worker must sleep before its next tick
    pub interval: u64,
}

impl HeartbeatResponse {
    /// The server-chosen next interval, if the response carried one
    pub fn next_interval(&self) -> Option<u64> {
        self.data.as_ref().map(|d| d.interval)
    }
}

/// Browser-like headers the endpoint expects alongside the JSON body
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static(APP_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(APP_REFERER));
    headers
}
