//! Configuration for the Asaas adapter

use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;

/// Default request timeout used when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for building a [`crate::ReqwestAdapter`].
///
/// This struct holds all the configuration options for creating an adapter,
/// either assembled in code or loaded from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Access token sent as the `access_token` header on every request
    pub access_token: Option<SecretString>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Default timeout for requests
    pub timeout: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an access token.
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(SecretString::new(access_token.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `ASAAS_ACCESS_TOKEN` for authentication
    /// - `ASAAS_BASE_URL` for the API base URL
    /// - `ASAAS_TIMEOUT` for request timeout (in seconds)
    ///
    /// A `.env` file in the working directory is honored if present.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(access_token) = env::var("ASAAS_ACCESS_TOKEN") {
            config.access_token = Some(SecretString::new(access_token.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("ASAAS_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout_str) = env::var("ASAAS_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.access_token.is_some() {
            self.access_token = other.access_token;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if !other.default_headers.is_empty() {
            for (key, value) in other.default_headers.iter() {
                self.default_headers.insert(key.clone(), value.clone());
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.access_token.is_none());
        assert!(config.base_url.is_none());
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_config_with_access_token() {
        let config = ClientConfig::with_access_token("test-token");
        assert!(config.access_token.is_some());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_config_merge() {
        let config1 = ClientConfig::with_access_token("token1");
        let config2 = ClientConfig {
            base_url: Some("https://example.com".to_string()),
            timeout: Duration::from_secs(10),
            ..Default::default()
        };

        let merged = config1.merge(config2);
        assert!(merged.access_token.is_some());
        assert_eq!(merged.base_url, Some("https://example.com".to_string()));
        assert_eq!(merged.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_merge_default_timeout_does_not_override() {
        let config1 = ClientConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };

        let merged = config1.merge(ClientConfig::default());
        assert_eq!(merged.timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("ASAAS_ACCESS_TOKEN", Some("test-env-token".to_string())),
                (
                    "ASAAS_BASE_URL",
                    Some("https://api-sandbox.asaas.com/v3".to_string()),
                ),
                ("ASAAS_TIMEOUT", Some("120".to_string())),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert!(config.access_token.is_some());
                assert_eq!(
                    config.base_url,
                    Some("https://api-sandbox.asaas.com/v3".to_string())
                );
                assert_eq!(config.timeout, Duration::from_secs(120));
            },
        );
    }
}
