//! HTTP client module
//!
//! Provides the HTTPS transport used by the REST connectors.
//!
//! # Features
//!
//! - **Bounded Retries**: transient connection failures retried with backoff
//! - **Timeouts**: every call is bounded, a timeout is never retried
//! - **Rate Limiting**: optional token bucket rate limiter using governor
//! - **Self-signed endpoints**: certificate validation disabled by default

mod client;
mod rate_limit;

pub use client::{Credentials, HttpClient, HttpClientConfig, HttpClientConfigBuilder, HttpResponse};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
