//! The transport seam and its default ureq implementation.
//!
//! # Design
//! A `Transport` hands out request/response objects, performs one blocking
//! round trip, and takes the objects back. `Exchange` owns one borrowed pair
//! and returns both on drop, so every exit path of a terminal operation
//! releases exactly once. 4xx/5xx responses are data here; deciding what
//! counts as failure is the builder's job.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, TransportRequest, TransportResponse, CONTENT_LENGTH};

/// Blocking HTTP round-trip engine with pooled request/response objects.
///
/// Implementations must be safe to share between threads; each builder uses
/// its own pair of objects.
pub trait Transport: Send + Sync {
    fn acquire_request(&self) -> TransportRequest {
        TransportRequest::default()
    }

    fn acquire_response(&self) -> TransportResponse {
        TransportResponse::default()
    }

    fn release_request(&self, _request: TransportRequest) {}

    fn release_response(&self, _response: TransportResponse) {}

    /// Send `request` and fill `response` with the status, headers and body.
    fn execute(
        &self,
        request: &TransportRequest,
        response: &mut TransportResponse,
    ) -> Result<(), TransportError>;
}

/// A request/response pair borrowed from a transport for one call.
pub(crate) struct Exchange {
    transport: Arc<dyn Transport>,
    request: TransportRequest,
    response: TransportResponse,
}

impl Exchange {
    pub(crate) fn acquire(transport: Arc<dyn Transport>) -> Self {
        let request = transport.acquire_request();
        let response = transport.acquire_response();
        Self {
            transport,
            request,
            response,
        }
    }

    pub(crate) fn request(&self) -> &TransportRequest {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut TransportRequest {
        &mut self.request
    }

    pub(crate) fn response(&self) -> &TransportResponse {
        &self.response
    }

    pub(crate) fn execute(&mut self) -> Result<(), TransportError> {
        self.transport.execute(&self.request, &mut self.response)
    }
}

impl Drop for Exchange {
    fn drop(&mut self) {
        self.transport
            .release_request(std::mem::take(&mut self.request));
        self.transport
            .release_response(std::mem::take(&mut self.response));
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("request", &self.request)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

const MAX_IDLE_OBJECTS: usize = 64;

/// Free-list of reset objects. Anything beyond `MAX_IDLE_OBJECTS` is dropped.
struct Pool<T> {
    idle: Mutex<Vec<T>>,
}

impl<T: Default> Pool<T> {
    fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    fn acquire(&self) -> T {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    fn release(&self, item: T) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_IDLE_OBJECTS {
            idle.push(item);
        }
    }

    fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Default transport: a shared `ureq::Agent` plus object pools.
///
/// Redirects are not followed; a 3xx comes back as the response itself.
pub struct UreqTransport {
    agent: ureq::Agent,
    max_body_size: u64,
    requests: Pool<TransportRequest>,
    responses: Pool<TransportResponse>,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .user_agent(config.user_agent.clone())
            .timeout_send_request(Some(config.write_timeout))
            .timeout_send_body(Some(config.write_timeout))
            .timeout_recv_response(Some(config.read_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .build()
            .new_agent();

        Self {
            agent,
            max_body_size: config.max_body_size,
            requests: Pool::new(),
            responses: Pool::new(),
        }
    }

    /// Number of idle (request, response) objects waiting for reuse.
    pub fn idle_objects(&self) -> (usize, usize) {
        (self.requests.idle(), self.responses.idle())
    }
}

impl Transport for UreqTransport {
    fn acquire_request(&self) -> TransportRequest {
        self.requests.acquire()
    }

    fn acquire_response(&self) -> TransportResponse {
        self.responses.acquire()
    }

    fn release_request(&self, mut request: TransportRequest) {
        request.reset();
        self.requests.release(request);
    }

    fn release_response(&self, mut response: TransportResponse) {
        response.reset();
        self.responses.release(response);
    }

    fn execute(
        &self,
        request: &TransportRequest,
        response: &mut TransportResponse,
    ) -> Result<(), TransportError> {
        let uri = request.uri();
        let result = match request.method().unwrap_or(HttpMethod::Get) {
            HttpMethod::Get => with_headers(self.agent.get(uri), request).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(uri), request).call(),
            HttpMethod::Post => with_headers(self.agent.post(uri), request).send(request.body()),
            HttpMethod::Put => with_headers(self.agent.put(uri), request).send(request.body()),
        };
        let mut reply = result?;

        response.reset();
        response.set_status_code(reply.status().as_u16());
        response.set_http11(reply.version() == ureq::http::Version::HTTP_11);
        for (name, value) in reply.headers() {
            response.add_header(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = reply
            .body_mut()
            .with_config()
            .limit(self.max_body_size)
            .read_to_vec()?;
        response.set_body(body);
        Ok(())
    }
}

/// Copy request headers onto a ureq builder. `Content-Length` is left to ureq,
/// which derives it from the body it sends.
fn with_headers<B>(
    builder: ureq::RequestBuilder<B>,
    request: &TransportRequest,
) -> ureq::RequestBuilder<B> {
    request
        .headers()
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(CONTENT_LENGTH))
        .fold(builder, |builder, (key, value)| {
            builder.header(key.as_str(), value.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_reuses_released_objects() {
        let transport = UreqTransport::new(&ClientConfig::default());
        assert_eq!(transport.idle_objects(), (0, 0));

        let mut req = transport.acquire_request();
        req.set_uri("http://localhost/a");
        let resp = transport.acquire_response();
        transport.release_request(req);
        transport.release_response(resp);
        assert_eq!(transport.idle_objects(), (1, 1));

        let reused = transport.acquire_request();
        assert!(reused.uri().is_empty(), "released request must be reset");
        assert_eq!(transport.idle_objects(), (0, 1));
    }

    #[test]
    fn pool_caps_idle_objects() {
        let pool: Pool<TransportRequest> = Pool::new();
        for _ in 0..MAX_IDLE_OBJECTS + 5 {
            pool.release(TransportRequest::default());
        }
        assert_eq!(pool.idle(), MAX_IDLE_OBJECTS);
    }
}
