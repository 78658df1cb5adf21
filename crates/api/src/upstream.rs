//! HTTP client for the third-party telemetry feed.
//!
//! The upstream publishes one JSON document per hour bucket at
//! `{base}{hh}.json`. It is cross-origin and unreliable, so responses are
//! read as raw text and repaired here before being forwarded.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use atlas_core::telemetry::repair_json;

/// Errors from the telemetry upstream.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body read).
    #[error("upstream unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("upstream returned status {status}")]
    Status { status: u16 },
}

/// HTTP client for the telemetry upstream.
pub struct TreasureUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl TreasureUpstream {
    /// Create a client for `base_url` (which must end with `/`).
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create an upstream client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Full URL of one hour bucket, e.g. `{base}07.json`.
    pub fn hour_url(&self, hour_code: &str) -> String {
        format!("{}{hour_code}.json", self.base_url)
    }

    /// Fetch one hour bucket as raw text.
    ///
    /// Non-2xx responses fail with [`UpstreamError::Status`]; the body is not
    /// read. There is no retry at this layer.
    pub async fn fetch_hour(&self, hour_code: &str) -> Result<String, UpstreamError> {
        let url = self.hour_url(hour_code);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch one hour bucket and repair it for forwarding.
    pub async fn proxy_hour(&self, hour_code: &str) -> Result<ProxyPayload, UpstreamError> {
        let text = self.fetch_hour(hour_code).await?;
        Ok(repair_upstream_payload(text))
    }
}

// ---------------------------------------------------------------------------
// Proxy payload
// ---------------------------------------------------------------------------

/// What the proxy forwards to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyPayload {
    /// Parsed JSON, either as received or recovered from the bracketed span.
    Json(Value),
    /// Unparseable text, forwarded verbatim.
    Raw(String),
}

/// Server-side repair of an upstream body.
///
/// Never fails: when neither the full text nor its bracketed span parses,
/// the original text is passed through untouched.
pub fn repair_upstream_payload(text: String) -> ProxyPayload {
    match repair_json(&text) {
        Some(value) => ProxyPayload::Json(value),
        None => ProxyPayload::Raw(text),
    }
}

impl IntoResponse for ProxyPayload {
    fn into_response(self) -> Response {
        match self {
            ProxyPayload::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            ProxyPayload::Raw(text) => {
                (StatusCode::OK, [(CONTENT_TYPE, "application/json")], text).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn hour_url_appends_code_and_extension() {
        let upstream = TreasureUpstream::with_client(
            reqwest::Client::new(),
            "https://feed.test/treasure/".into(),
        );
        assert_eq!(upstream.hour_url("07"), "https://feed.test/treasure/07.json");
    }

    #[test]
    fn valid_json_is_forwarded_parsed() {
        assert_eq!(
            repair_upstream_payload("[[1,2,3]]".into()),
            ProxyPayload::Json(json!([[1, 2, 3]]))
        );
    }

    #[test]
    fn wrapped_array_is_recovered() {
        assert_eq!(
            repair_upstream_payload("garbage[[1,2],[3,4]]trailing".into()),
            ProxyPayload::Json(json!([[1, 2], [3, 4]]))
        );
    }

    #[test]
    fn unrecoverable_text_passes_through() {
        assert_eq!(
            repair_upstream_payload("no brackets".into()),
            ProxyPayload::Raw("no brackets".into())
        );
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let upstream = TreasureUpstream::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
        let err = upstream.fetch_hour("00").await.unwrap_err();
        assert_matches!(err, UpstreamError::Unreachable(_));
    }
}
