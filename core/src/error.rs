//! Error types for the request builder.
//!
//! # Design
//! One variant per failure kind a terminal operation can hit, in the order
//! they are checked: the deferred JSON encode error, the transport failure,
//! the status check, and finally body decoding. `HttpError` keeps the status
//! code as a field so callers can match on it instead of parsing the message.

/// Boxed error returned by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the terminal operations of `Request`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// `set_json_body` could not serialize its argument. Captured while
    /// building and reported before any network call.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The round trip itself failed (connect, timeout, protocol).
    #[error("transport failed: {0}")]
    TransportError(#[source] TransportError),

    /// The server answered with a status code of 400 or above.
    #[error("the requested URL returned error: {status}")]
    HttpError { status: u16 },

    /// The response body is not valid JSON for the requested type.
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[source] serde_json::Error),

    /// The response body is not valid XML for the requested type.
    #[error("XML deserialization failed: {0}")]
    XmlError(#[source] quick_xml::de::DeError),
}

impl RequestError {
    /// Status code carried by an `HttpError`, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpError { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_embeds_status() {
        let err = RequestError::HttpError { status: 503 };
        assert_eq!(err.to_string(), "the requested URL returned error: 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn transport_error_keeps_source() {
        let inner: TransportError = "connection refused".into();
        let err = RequestError::TransportError(inner);
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }
}
