//! HTTP response handling

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Rate-limit quota for the access token, derived from the response headers
/// of the latest completed call.
///
/// The Asaas API reports quota through the `RateLimit-Limit`,
/// `RateLimit-Remaining` and `RateLimit-Reset` response headers. A header
/// that is absent or unparseable coerces to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Number of requests allowed in the current window
    pub limit: u64,
    /// Number of requests remaining in the current window
    pub remaining: u64,
    /// Seconds until the quota resets
    pub reset: u64,
}

impl RateLimitInfo {
    /// Parse rate-limit quota from response headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: parse_header_u64(headers, "RateLimit-Limit"),
            remaining: parse_header_u64(headers, "RateLimit-Remaining"),
            reset: parse_header_u64(headers, "RateLimit-Reset"),
        }
    }
}

impl Response {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response and return the raw body bytes.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Get the body as a string, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, crate::error::Error> {
        serde_json::from_slice(&self.body).map_err(crate::error::Error::Serialization)
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if the response is an error (4xx or 5xx status).
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// Get the rate-limit quota reported by this response.
    pub fn rate_limit(&self) -> RateLimitInfo {
        RateLimitInfo::from_headers(&self.headers)
    }
}

fn parse_header_u64(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}
