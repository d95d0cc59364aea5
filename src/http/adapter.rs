//! Verb-call adapter for the Asaas API
//!
//! This module defines the `HttpAdapter` trait, the seam between domain
//! callers and the HTTP transport, and its reqwest-backed implementation.
//! The adapter injects the `access_token` header on every outgoing request,
//! records the rate-limit headers of the latest completed call, and converts
//! non-success responses into normalized [`Error::Api`] values.

use super::response::{RateLimitInfo, Response};
use super::Method;
use crate::error::{Error, Result};
use async_trait::async_trait;
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter translating generic verb calls into transport-specific calls.
///
/// Implementations issue a single round trip per call, with no retries. On a
/// 2xx response the raw body bytes are returned verbatim; the caller is
/// responsible for decoding (e.g. JSON parsing). On a non-2xx response the
/// call fails with the normalized [`Error::Api`] built from the error body.
#[async_trait]
pub trait HttpAdapter: Send + Sync + fmt::Debug {
    /// Issue a GET request to `path` (joined against the base URL).
    async fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Issue a DELETE request to `path`.
    async fn delete(&self, path: &str) -> Result<Vec<u8>>;

    /// Issue a PUT request sending `body` as the raw request payload,
    /// byte-for-byte, with no content type forced.
    async fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>>;

    /// Issue a POST request sending `body` JSON-encoded with
    /// `content-type: application/json`. `None` sends no body.
    async fn post(
        &self,
        path: &str,
        body: Option<&(dyn erased_serde::Serialize + Send + Sync)>,
    ) -> Result<Vec<u8>>;

    /// Rate-limit quota reported by the latest completed call.
    ///
    /// Returns `None` if no call has completed yet. Headers absent from the
    /// latest response coerce to `0`.
    fn latest_rate_limit(&self) -> Option<RateLimitInfo>;

    /// Get the base URL for this adapter (for debugging).
    fn base_url(&self) -> &str;
}

/// Outgoing payload shape. PUT bodies are sent raw, POST bodies JSON-encoded.
enum Payload<'a> {
    None,
    Raw(&'a [u8]),
    Json(Vec<u8>),
}

/// Reqwest-backed [`HttpAdapter`] for the Asaas API.
///
/// # Concurrency
///
/// The adapter is cheap to clone and safe to share across tasks, but the
/// latest-response snapshot read by [`HttpAdapter::latest_rate_limit`] is a
/// single slot: concurrent calls through one adapter leave it reflecting
/// whichever call finished last. Callers that need deterministic header
/// inspection should use one adapter per in-flight request.
///
/// # Example
///
/// ```rust,no_run
/// use asaas::ReqwestAdapter;
///
/// let adapter = ReqwestAdapter::builder()
///     .access_token("your-access-token")
///     .sandbox()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestAdapter {
    inner: Arc<AdapterInner>,
}

#[derive(Debug)]
struct AdapterInner {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Base URL for the API, always ending in a trailing slash
    base_url: Url,
    /// Access token sent as the `access_token` header on every request
    access_token: SecretString,
    /// Default timeout for requests
    timeout: Duration,
    /// Custom headers to include with every request
    default_headers: HeaderMap,
    /// Headers of the most recently completed call, replaced wholesale
    latest_headers: Mutex<Option<HeaderMap>>,
}

impl ReqwestAdapter {
    /// Create a new adapter with an access token and default configuration.
    ///
    /// # Panics
    ///
    /// This convenience method panics if the adapter cannot be built with the
    /// default configuration. For fallible construction use
    /// [`ReqwestAdapter::try_new()`] instead.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::builder()
            .access_token(access_token)
            .build()
            .expect("Failed to build adapter with provided access token")
    }

    /// Create a new adapter with an access token (fallible version).
    pub fn try_new(access_token: impl Into<String>) -> Result<Self> {
        Self::builder().access_token(access_token).build()
    }

    /// Create an adapter that issues requests through a pre-configured
    /// `reqwest` client.
    ///
    /// The adapter still injects the `access_token` header on every request;
    /// the supplied client only controls transport concerns (timeouts,
    /// proxies, TLS, connection pooling).
    pub fn with_client(access_token: impl Into<String>, client: reqwest::Client) -> Result<Self> {
        Self::builder()
            .access_token(access_token)
            .http_client(client)
            .build()
    }

    /// Create a new builder for advanced configuration.
    pub fn builder() -> ReqwestAdapterBuilder {
        ReqwestAdapterBuilder::default()
    }

    /// Create an adapter from a configuration object.
    pub fn from_config(config: crate::config::ClientConfig) -> Result<Self> {
        let mut builder = Self::builder().timeout(config.timeout);

        if let Some(access_token) = config.access_token {
            builder = builder.access_token(access_token.expose_secret());
        }
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        for (key, value) in &config.default_headers {
            if let Ok(value_str) = value.to_str() {
                builder = builder.header(key.as_str(), value_str)?;
            }
        }

        builder.build()
    }

    fn join_url(&self, path: &str) -> Result<Url> {
        if path.trim().is_empty() {
            return Err(Error::InvalidUrl("request path cannot be empty".to_string()));
        }

        // The base URL carries a version segment (/v3), so absolute paths
        // must not reset to the host root.
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                Error::InvalidUrl(format!("failed to construct URL from path '{path}': {e}"))
            })
    }

    /// Issue one round trip and record its outcome.
    ///
    /// The latest-header slot is only written once the response has been
    /// fully read, and is replaced wholesale, so a failed transfer leaves the
    /// previous snapshot intact and readers never observe a torn update.
    async fn send(&self, method: Method, path: &str, payload: Payload<'_>) -> Result<Response> {
        let url = self.join_url(path)?;

        let mut req = self
            .inner
            .http_client
            .request(method.clone(), url)
            .timeout(self.inner.timeout)
            .header("access_token", self.inner.access_token.expose_secret());

        for (key, value) in &self.inner.default_headers {
            req = req.header(key, value);
        }

        match payload {
            Payload::None => {}
            Payload::Raw(body) => req = req.body(body.to_vec()),
            Payload::Json(body) => {
                req = req.header("content-type", "application/json").body(body);
            }
        }

        tracing::debug!(%method, path, "sending request");

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.inner.timeout)
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?
            .to_vec();

        tracing::debug!(%method, path, status = status.as_u16(), "received response");

        let response = Response::new(status, headers, body);

        *self
            .inner
            .latest_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(response.headers().clone());

        if response.is_error() {
            return Err(Error::from_response(
                response.status().as_u16(),
                &response.text(),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.send(Method::GET, path, Payload::None).await?.into_body())
    }

    async fn delete(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self
            .send(Method::DELETE, path, Payload::None)
            .await?
            .into_body())
    }

    async fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        Ok(self
            .send(Method::PUT, path, Payload::Raw(body))
            .await?
            .into_body())
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&(dyn erased_serde::Serialize + Send + Sync)>,
    ) -> Result<Vec<u8>> {
        let payload = match body {
            Some(body) => Payload::Json(serialize_body(body)?),
            None => Payload::None,
        };

        Ok(self.send(Method::POST, path, payload).await?.into_body())
    }

    fn latest_rate_limit(&self) -> Option<RateLimitInfo> {
        self.inner
            .latest_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(RateLimitInfo::from_headers)
    }

    fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }
}

/// Helper function to serialize a POST body to JSON bytes.
pub(crate) fn serialize_body(
    body: &(dyn erased_serde::Serialize + Send + Sync),
) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(Error::Serialization)
}

/// Builder for creating a [`ReqwestAdapter`] with custom configuration.
///
/// # Example
///
/// ```rust,no_run
/// use asaas::ReqwestAdapter;
/// use std::time::Duration;
///
/// let adapter = ReqwestAdapter::builder()
///     .access_token("your-access-token")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct ReqwestAdapterBuilder {
    access_token: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    http_client: Option<reqwest::Client>,
}

impl ReqwestAdapterBuilder {
    /// Set the access token sent as the `access_token` header.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::new(access_token.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    ///
    /// Defaults to [`crate::DEFAULT_BASE_URL`]. A trailing slash is appended
    /// if missing so that resource paths join below the version segment.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Point the adapter at the sandbox environment.
    pub fn sandbox(mut self) -> Self {
        self.base_url = Some(crate::SANDBOX_BASE_URL.to_string());
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a pre-configured `reqwest` client instead of building a default
    /// one. The configured timeout still applies per request.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Add a custom header to include with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<http::HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value = value_str
            .parse::<http::HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the adapter with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No access token is provided (and, with the `env` feature, none is
    ///   found in `ASAAS_ACCESS_TOKEN`)
    /// - The base URL is empty, unparseable, or not http/https
    /// - HTTP client creation fails
    pub fn build(mut self) -> Result<ReqwestAdapter> {
        #[cfg(feature = "env")]
        if self.access_token.is_none() {
            self.access_token = std::env::var("ASAAS_ACCESS_TOKEN")
                .ok()
                .map(|s| SecretString::new(s.into_boxed_str()));
        }

        let access_token = self.access_token.ok_or_else(|| {
            Error::MissingConfig(
                "no access token provided; set ASAAS_ACCESS_TOKEN or pass one explicitly"
                    .to_string(),
            )
        })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(format!("asaas-rust/{}", crate::VERSION))
                .build()
                .map_err(|e| Error::HttpClient(e.to_string()))?,
        };

        let base_url_string = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string());

        if base_url_string.trim().is_empty() {
            return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
        }

        // Trailing slash so Url::join keeps the version segment.
        let base_url_string = if base_url_string.ends_with('/') {
            base_url_string
        } else {
            format!("{base_url_string}/")
        };

        let base_url: Url = base_url_string
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!(
                    "Invalid URL scheme '{scheme}'. Only 'http' and 'https' are supported."
                )));
            }
        }

        Ok(ReqwestAdapter {
            inner: Arc::new(AdapterInner {
                http_client,
                base_url,
                access_token,
                timeout,
                default_headers: self.default_headers,
                latest_headers: Mutex::new(None),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_builder_with_access_token() {
        let adapter = ReqwestAdapter::builder()
            .access_token("test-token")
            .build()
            .unwrap();

        assert_eq!(adapter.base_url(), "https://api.asaas.com/v3/");
        assert!(adapter.latest_rate_limit().is_none());
    }

    #[test]
    fn test_builder_without_token_fails() {
        temp_env::with_var_unset("ASAAS_ACCESS_TOKEN", || {
            let result = ReqwestAdapter::builder().build();
            assert!(matches!(result, Err(Error::MissingConfig(_))));
        });
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_builder_reads_token_from_env() {
        temp_env::with_var("ASAAS_ACCESS_TOKEN", Some("env-token"), || {
            let adapter = ReqwestAdapter::builder().build();
            assert!(adapter.is_ok());
        });
    }

    #[test]
    fn test_builder_sandbox() {
        let adapter = ReqwestAdapter::builder()
            .access_token("test-token")
            .sandbox()
            .build()
            .unwrap();

        assert_eq!(adapter.base_url(), "https://api-sandbox.asaas.com/v3/");
    }

    #[test]
    fn test_builder_appends_trailing_slash() {
        let adapter = ReqwestAdapter::builder()
            .access_token("test-token")
            .base_url("https://example.com/v3")
            .build()
            .unwrap();

        assert_eq!(adapter.base_url(), "https://example.com/v3/");
    }

    #[test]
    fn test_builder_rejects_empty_base_url() {
        let result = ReqwestAdapter::builder()
            .access_token("test-token")
            .base_url("   ")
            .build();

        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_scheme() {
        let result = ReqwestAdapter::builder()
            .access_token("test-token")
            .base_url("ftp://example.com")
            .build();

        match result {
            Err(Error::InvalidUrl(msg)) => assert!(msg.contains("ftp")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let result = ReqwestAdapter::builder()
            .access_token("test-token")
            .header("bad header name", "value");

        assert!(matches!(result, Err(Error::InvalidHeaderName(_))));
    }

    #[test]
    fn test_join_url_keeps_version_segment() {
        let adapter = ReqwestAdapter::builder()
            .access_token("test-token")
            .build()
            .unwrap();

        let url = adapter.join_url("/customers").unwrap();
        assert_eq!(url.as_str(), "https://api.asaas.com/v3/customers");

        let url = adapter.join_url("payments/pay_123").unwrap();
        assert_eq!(url.as_str(), "https://api.asaas.com/v3/payments/pay_123");
    }

    #[test]
    fn test_join_url_rejects_empty_path() {
        let adapter = ReqwestAdapter::builder()
            .access_token("test-token")
            .build()
            .unwrap();

        assert!(matches!(
            adapter.join_url("  "),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[derive(Serialize)]
    struct TestPayload {
        name: String,
    }

    #[test]
    fn test_serialize_body() {
        let payload = TestPayload {
            name: "test".to_string(),
        };
        let bytes = serialize_body(&payload).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["name"], "test");
    }

    #[test]
    fn test_try_new_uses_default_base_url() {
        let adapter = ReqwestAdapter::try_new("test-token").unwrap();
        assert_eq!(adapter.base_url(), "https://api.asaas.com/v3/");
    }

    #[test]
    fn test_with_client_accepts_preconfigured_client() {
        let client = reqwest::Client::new();
        let adapter = ReqwestAdapter::with_client("test-token", client).unwrap();
        assert_eq!(adapter.base_url(), "https://api.asaas.com/v3/");
    }

    #[test]
    fn test_from_config() {
        let config = crate::config::ClientConfig {
            base_url: Some("https://api-sandbox.asaas.com/v3".to_string()),
            timeout: Duration::from_secs(10),
            ..crate::config::ClientConfig::with_access_token("test-token")
        };

        let adapter = ReqwestAdapter::from_config(config).unwrap();
        assert_eq!(adapter.base_url(), "https://api-sandbox.asaas.com/v3/");
    }

    #[test]
    fn test_from_config_without_token_fails() {
        temp_env::with_var_unset("ASAAS_ACCESS_TOKEN", || {
            let result = ReqwestAdapter::from_config(crate::config::ClientConfig::default());
            assert!(matches!(result, Err(Error::MissingConfig(_))));
        });
    }

    #[test]
    fn test_adapter_clone_shares_latest_snapshot() {
        let adapter1 = ReqwestAdapter::new("test-token");
        let adapter2 = adapter1.clone();

        assert_eq!(adapter1.base_url(), adapter2.base_url());
        assert!(adapter2.latest_rate_limit().is_none());
    }
}
