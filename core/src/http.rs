//! HTTP data types exchanged with a `Transport`.
//!
//! # Design
//! `TransportRequest` and `TransportResponse` are the pooled objects a
//! transport hands out. They are plain owned data so a transport can keep a
//! free-list of them and reset them between uses. Header names are matched
//! case-insensitively; storage order is the order headers were first set or
//! received.

use std::collections::HashMap;
use std::fmt;

pub const CONTENT_TYPE: &str = "content-type";
pub const CONTENT_LENGTH: &str = "content-length";

pub const APPLICATION_JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request object, borrowed from a transport's pool.
#[derive(Debug, Clone, Default)]
pub struct TransportRequest {
    method: Option<HttpMethod>,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TransportRequest {
    /// Method to send. `None` until a verb is chosen; transports send GET.
    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = Some(method);
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        find_header(&self.headers, key)
    }

    /// Set `key` to `value`, replacing any existing value for that name.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key.to_string(), value)),
        }
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.set_header(CONTENT_TYPE, content_type);
    }

    pub fn set_content_length(&mut self, len: usize) {
        self.set_header(CONTENT_LENGTH, len.to_string());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Clear all state, keeping allocations for reuse.
    pub fn reset(&mut self) {
        self.method = None;
        self.uri.clear();
        self.headers.clear();
        self.body.clear();
    }
}

/// Incoming response object, borrowed from a transport's pool and filled in
/// by `Transport::execute`.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status_code: u16,
    http11: bool,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for TransportResponse {
    fn default() -> Self {
        Self {
            status_code: 200,
            http11: true,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl TransportResponse {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn set_status_code(&mut self, status: u16) {
        self.status_code = status;
    }

    pub fn is_http11(&self) -> bool {
        self.http11
    }

    pub fn set_http11(&mut self, http11: bool) {
        self.http11 = http11;
    }

    /// Declared `Content-Length`, or -1 when absent or unparseable.
    pub fn content_length(&self) -> i64 {
        self.header(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(-1)
    }

    pub fn content_type(&self) -> &str {
        self.header(CONTENT_TYPE).unwrap_or("")
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        find_header(&self.headers, key)
    }

    /// Append a received header. Repeated names are kept as separate entries.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push((key.into(), value.into()));
    }

    /// All received headers in arrival order, repeats included.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    pub fn reset(&mut self) {
        self.status_code = 200;
        self.http11 = true;
        self.headers.clear();
        self.body.clear();
    }
}

fn find_header<'a>(headers: &'a [(String, String)], key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// Response metadata a caller can ask a terminal operation to fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status_code: u16,
    pub http11: bool,
    pub content_length: i64,
    pub content_type: String,
    /// One value per header name; the first occurrence wins. Names are as
    /// the transport reports them, which is lowercase for `UreqTransport`
    /// (`content-length`, not `Content-Length`).
    pub header: HashMap<String, String>,
}

impl ResponseSummary {
    pub(crate) fn fill_from(&mut self, resp: &TransportResponse) {
        self.status_code = resp.status_code();
        self.http11 = resp.is_http11();
        self.content_length = resp.content_length();
        self.content_type = resp.content_type().to_string();
        self.header = HashMap::new();
        for (key, value) in resp.headers() {
            self.header
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_overwrites_case_insensitively() {
        let mut req = TransportRequest::default();
        req.set_header("X-Token", "a");
        req.set_header("x-token", "b");
        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.header("X-TOKEN"), Some("b"));
    }

    #[test]
    fn reset_clears_request() {
        let mut req = TransportRequest::default();
        req.set_method(HttpMethod::Put);
        req.set_uri("http://localhost/x");
        req.set_body(b"abc".to_vec());
        req.set_content_length(3);
        req.reset();
        assert!(req.method().is_none());
        assert!(req.uri().is_empty());
        assert!(req.headers().is_empty());
        assert!(req.body().is_empty());
    }

    #[test]
    fn content_length_defaults_to_minus_one() {
        let mut resp = TransportResponse::default();
        assert_eq!(resp.content_length(), -1);
        resp.add_header("Content-Length", "42");
        assert_eq!(resp.content_length(), 42);
    }

    #[test]
    fn summary_keeps_first_value_of_repeated_header() {
        let mut resp = TransportResponse::default();
        resp.set_status_code(201);
        resp.set_http11(false);
        resp.add_header("Content-Type", "text/plain");
        resp.add_header("Set-Cookie", "a=1");
        resp.add_header("Set-Cookie", "b=2");

        let mut summary = ResponseSummary::default();
        summary.fill_from(&resp);
        assert_eq!(summary.status_code, 201);
        assert!(!summary.http11);
        assert_eq!(summary.content_type, "text/plain");
        assert_eq!(summary.content_length, -1);
        assert_eq!(summary.header.len(), 2);
        assert_eq!(summary.header["Set-Cookie"], "a=1");
    }

    #[test]
    fn method_display_matches_wire_name() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
