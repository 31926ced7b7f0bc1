//! Shared client that creates request builders.
//!
//! # Design
//! `Client` wraps an `Arc<dyn Transport>` and is passed around explicitly;
//! there is no process-wide instance. Cloning shares the transport, and with
//! it the ureq connection pool and the object pools.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::ClientConfig;
use crate::request::Request;
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client backed by `UreqTransport` built from `config`.
    pub fn new(config: ClientConfig) -> Self {
        debug!(
            read_timeout = ?config.read_timeout,
            write_timeout = ?config.write_timeout,
            user_agent = %config.user_agent,
            "creating HTTP client"
        );
        Self::with_transport(UreqTransport::new(&config))
    }

    /// Client with the same read and write timeout.
    pub fn with_timeout(rw_timeout: Duration) -> Self {
        Self::new(ClientConfig::with_timeout(rw_timeout))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Start building a request to `url`, acquiring its pooled objects.
    pub fn request(&self, url: impl Into<String>) -> Request {
        Request::new(Arc::clone(&self.transport), url.into())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
