//! Error types for the Asaas SDK
//!
//! The API surfaces a single normalized error kind for non-success HTTP
//! responses, built uniformly regardless of the shape of the remote failure
//! body, plus explicit transport-failure kinds for requests that never
//! produced a response at all.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with an Asaas SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback message used when an error body carries neither an `errors`
/// array nor a `message` field.
const FALLBACK_MESSAGE: &str = "Request not processed.";

/// Main error type for the Asaas SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Normalized API error for any non-success HTTP response.
    ///
    /// The message is built from the response body (see
    /// [`Error::from_response`]) and always carries human-readable text,
    /// never an empty string.
    #[error("API request failed (status {status}): {message}")]
    Api {
        /// Normalized message from the API error body
        message: String,
        /// HTTP status code of the failed response
        status: u16,
    },

    /// Network failure that produced no HTTP response at all (DNS failure,
    /// connection refused, broken transfer).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout reported by the underlying HTTP client.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL or request path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build the normalized API error from a non-success response status and body.
    ///
    /// The body is parsed as JSON; a parse failure degrades to the fallback
    /// message rather than raising a secondary error. If the body carries an
    /// `errors` array of `{code, description}` entries, the message joins
    /// `"<code>: <description>"` per entry with `<br>` separators, preserving
    /// order. Otherwise a top-level `message` string is used verbatim, and
    /// failing that the literal `"Request not processed."`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let content: serde_json::Value =
            serde_json::from_str(body).unwrap_or(serde_json::Value::Null);

        let errors: Vec<String> = content
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| {
                        let code = entry
                            .get("code")
                            .and_then(serde_json::Value::as_str)
                            .unwrap_or_default();
                        let description = entry
                            .get("description")
                            .and_then(serde_json::Value::as_str)
                            .unwrap_or_default();
                        format!("{code}: {description}")
                    })
                    .collect()
            })
            .unwrap_or_default();

        if !errors.is_empty() {
            return Error::Api {
                message: errors.join("<br>"),
                status,
            };
        }

        let message = content
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| FALLBACK_MESSAGE.to_string(), str::to_string);

        Error::Api { message, status }
    }

    /// HTTP status code if this is a normalized API error.
    pub fn status(&self) -> Option<u16> {
        if let Error::Api { status, .. } = self {
            Some(*status)
        } else {
            None
        }
    }
}
