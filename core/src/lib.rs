//! Fluent blocking HTTP request builder.
//!
//! # Overview
//! `Client::request(url)` returns a `Request` that is configured by chaining
//! (`post()`, `set_header`, `set_param`, `set_json_body`, ...) and consumed by
//! one terminal call that executes it and decodes the response as JSON, XML,
//! text or bytes.
//!
//! # Design
//! - The network engine sits behind the `Transport` trait; `UreqTransport`
//!   is the default and tests inject their own.
//! - Each `Request` borrows a request/response object pair from the
//!   transport and returns it on drop.
//! - Any status code of 400 or above is an error; other statuses decode.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{RequestError, TransportError};
pub use http::{HttpMethod, ResponseSummary, TransportRequest, TransportResponse};
pub use request::{ParamValue, Request};
pub use transport::{Transport, UreqTransport};
