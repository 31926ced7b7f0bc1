//! Fluent request builder.
//!
//! # Design
//! A `Request` is created by `Client::request`, configured through chained
//! by-value setters, and consumed by exactly one terminal operation
//! (`to_json`, `to_xml`, `to_string`, `to_bytes`). Consuming `self` makes a
//! second execution impossible, and the pooled transport objects go back to
//! the transport when the builder is dropped, whichever path got there.
//!
//! JSON encoding errors from `set_json_body` do not break the chain; they are
//! held until the terminal operation, which reports them before touching the
//! network.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::http::{
    HttpMethod, ResponseSummary, TransportResponse, APPLICATION_JSON, FORM_URLENCODED,
};
use crate::transport::{Exchange, Transport};

/// Scalar query parameter value, rendered with `Display` when the URL is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::UInt(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

macro_rules! param_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

param_from!(Int as i64: i8, i16, i32, i64);
param_from!(UInt as u64: u8, u16, u32, u64);
param_from!(Float as f64: f32, f64);
param_from!(Bool as bool: bool);

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::UInt(v as u64)
    }
}

/// One HTTP call under construction.
pub struct Request {
    url: String,
    params: BTreeMap<String, ParamValue>,
    deferred_error: Option<serde_json::Error>,
    exchange: Exchange,
}

impl Request {
    pub(crate) fn new(transport: Arc<dyn Transport>, url: String) -> Self {
        Self {
            url,
            params: BTreeMap::new(),
            deferred_error: None,
            exchange: Exchange::acquire(transport),
        }
    }

    #[must_use]
    pub fn get(self) -> Self {
        self.method(HttpMethod::Get)
    }

    #[must_use]
    pub fn post(self) -> Self {
        self.method(HttpMethod::Post)
    }

    #[must_use]
    pub fn put(self) -> Self {
        self.method(HttpMethod::Put)
    }

    #[must_use]
    pub fn delete(self) -> Self {
        self.method(HttpMethod::Delete)
    }

    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.exchange.request_mut().set_method(method);
        self
    }

    #[must_use]
    pub fn set_header(mut self, key: &str, value: &str) -> Self {
        self.exchange.request_mut().set_header(key, value);
        self
    }

    /// Add a query parameter; a repeated key replaces the earlier value.
    #[must_use]
    pub fn set_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Raw form-encoded body.
    #[must_use]
    pub fn set_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let req = self.exchange.request_mut();
        req.set_content_length(body.len());
        req.set_content_type(FORM_URLENCODED);
        req.set_body(body);
        self
    }

    /// JSON body. A serialization failure is reported by the terminal call.
    #[must_use]
    pub fn set_json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                let req = self.exchange.request_mut();
                req.set_content_length(body.len());
                req.set_content_type(APPLICATION_JSON);
                req.set_body(body);
            }
            Err(e) => self.deferred_error = Some(e),
        }
        self
    }

    /// Outgoing header value, if set.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.exchange.request().header(key)
    }

    /// Outgoing body as configured so far.
    pub fn body(&self) -> &[u8] {
        self.exchange.request().body()
    }

    /// The configured URL with all parameters appended to its query string.
    ///
    /// Without parameters the URL is returned as given. Otherwise the pairs
    /// are appended after any existing query, separated from it by `&`.
    /// Keys and values are not percent-encoded.
    pub fn uri(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }

        let (base, existing) = match self.url.split_once('?') {
            Some((base, query)) => (base, query),
            None => (self.url.as_str(), ""),
        };

        let mut query = String::from(existing);
        for (key, value) in &self.params {
            if !query.is_empty() && !query.ends_with('&') {
                query.push('&');
            }
            query.push_str(key);
            query.push('=');
            query.push_str(&value.to_string());
        }
        format!("{base}?{query}")
    }

    /// Execute and decode the body as JSON.
    pub fn to_json<T: DeserializeOwned>(
        mut self,
        summary: Option<&mut ResponseSummary>,
    ) -> Result<T, RequestError> {
        let resp = self.run(summary)?;
        serde_json::from_slice(resp.body()).map_err(RequestError::JsonError)
    }

    /// Execute and decode the body as XML.
    pub fn to_xml<T: DeserializeOwned>(
        mut self,
        summary: Option<&mut ResponseSummary>,
    ) -> Result<T, RequestError> {
        let resp = self.run(summary)?;
        quick_xml::de::from_reader(resp.body()).map_err(RequestError::XmlError)
    }

    /// Execute and return the body as text. Invalid UTF-8 is replaced.
    pub fn to_string(
        mut self,
        summary: Option<&mut ResponseSummary>,
    ) -> Result<String, RequestError> {
        let resp = self.run(summary)?;
        Ok(String::from_utf8_lossy(resp.body()).into_owned())
    }

    pub fn to_bytes(
        mut self,
        summary: Option<&mut ResponseSummary>,
    ) -> Result<Vec<u8>, RequestError> {
        let resp = self.run(summary)?;
        Ok(resp.body().to_vec())
    }

    fn run(
        &mut self,
        summary: Option<&mut ResponseSummary>,
    ) -> Result<&TransportResponse, RequestError> {
        if let Some(e) = self.deferred_error.take() {
            return Err(RequestError::SerializationError(e));
        }

        let uri = self.uri();
        let method = self
            .exchange
            .request()
            .method()
            .unwrap_or(HttpMethod::Get);
        debug!(%method, %uri, "sending request");
        self.exchange.request_mut().set_uri(uri);

        self.exchange
            .execute()
            .map_err(RequestError::TransportError)?;

        let resp = self.exchange.response();
        let status = resp.status_code();
        debug!(status, bytes = resp.body().len(), "received response");
        if status >= 400 {
            warn!(
                %method,
                uri = self.exchange.request().uri(),
                status,
                "request returned error status"
            );
            return Err(RequestError::HttpError { status });
        }

        if let Some(summary) = summary {
            summary.fill_from(resp);
        }
        Ok(resp)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("params", &self.params)
            .field("deferred_error", &self.deferred_error)
            .field("exchange", &self.exchange)
            .finish()
    }
}
