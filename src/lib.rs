//! # Asaas SDK
//!
//! Rust client adapter for the Asaas payments API supporting:
//! - GET/DELETE/PUT/POST verb calls against API resource paths
//! - Automatic `access_token` header injection on every request
//! - Rate-limit header extraction from the latest response
//! - Normalized API errors built from Asaas error bodies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use asaas::{HttpAdapter, ReqwestAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = ReqwestAdapter::new("your-access-token");
//!
//!     let body = adapter.get("customers").await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!
//!     if let Some(info) = adapter.latest_rate_limit() {
//!         println!("{} of {} calls remaining", info.remaining, info.limit);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{HttpAdapter, RateLimitInfo, ReqwestAdapter, ReqwestAdapterBuilder, Response};

// Module declarations
pub mod config;
pub mod error;
pub mod http;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use asaas::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ClientConfig, Error, HttpAdapter, RateLimitInfo, ReqwestAdapter, Response, Result,
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL (production)
pub const DEFAULT_BASE_URL: &str = "https://api.asaas.com/v3";

/// Sandbox API base URL
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.asaas.com/v3";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://api.asaas.com/v3");
        assert_eq!(SANDBOX_BASE_URL, "https://api-sandbox.asaas.com/v3");
    }
}
