//! Client configuration.
//!
//! Fixed for the life of a `Client`. Derives `Deserialize` so a host
//! application can embed it in its own config file; missing fields fall back
//! to the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the default ureq-backed transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upper bound for receiving the response head and body.
    pub read_timeout: Duration,
    /// Upper bound for sending the request head and body.
    pub write_timeout: Duration,
    pub user_agent: String,
    /// Largest response body read before the call fails. Unlimited by default.
    pub max_body_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl ClientConfig {
    /// Same timeout for reads and writes, default user agent.
    pub fn with_timeout(rw_timeout: Duration) -> Self {
        Self {
            read_timeout: rw_timeout,
            write_timeout: rw_timeout,
            user_agent: concat!("fast-request/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_size: u64::MAX,
        }
    }
}
