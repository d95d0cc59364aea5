//! HTTP adapter layer
//!
//! This module provides the verb-call adapter for the Asaas API: token
//! injection, rate-limit header extraction, and error normalization on top
//! of an underlying `reqwest` client.

pub use adapter::{HttpAdapter, ReqwestAdapter, ReqwestAdapterBuilder};
pub use response::{RateLimitInfo, Response};

mod adapter;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
