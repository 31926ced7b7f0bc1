use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Size of the `/large` body, just over 10 MiB.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

pub const WIDGET_XML: &str = "<widget><id>7</id><name>sprocket</name></widget>";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: u32,
    pub name: String,
}

/// What `/echo` saw of the incoming request. Header names are lowercase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/widget", get(widget_json))
        .route("/widget.xml", get(widget_xml))
        .route("/text", get(text))
        .route("/bytes", get(bytes))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/multi-header", get(multi_header))
        .route("/redirect", get(redirect))
        .route("/large", get(large))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn sample_widget() -> Widget {
    Widget {
        id: 7,
        name: "sprocket".to_string(),
    }
}

async fn widget_json() -> Json<Widget> {
    Json(sample_widget())
}

async fn widget_xml() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/xml")], WIDGET_XML)
}

async fn text() -> &'static str {
    "hello, world"
}

async fn bytes() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        vec![0u8, 159, 146, 150, 255],
    )
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    debug!(%method, %uri, len = body.len(), "echo");
    let headers = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        query: uri.query().unwrap_or("").to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {}", status.as_u16())).into_response()
}

async fn multi_header() -> Response {
    let mut resp = "ok".into_response();
    let headers = resp.headers_mut();
    headers.append("x-multi", HeaderValue::from_static("first"));
    headers.append("x-multi", HeaderValue::from_static("second"));
    resp
}

async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/widget")], "moved")
}

async fn large() -> Vec<u8> {
    vec![b'x'; LARGE_BODY_LEN]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_serializes_to_json() {
        let json = serde_json::to_value(sample_widget()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "sprocket");
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let echo = Echo {
            method: "PUT".to_string(),
            query: "a=1".to_string(),
            headers: BTreeMap::from([("x-k".to_string(), "v".to_string())]),
            body: "payload".to_string(),
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: Echo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, echo);
    }
}
