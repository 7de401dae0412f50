//! HTTP client with bounded retry and optional rate limiting
//!
//! Provides the HTTPS transport used by the REST connectors:
//! - Per-call timeout (a call that exceeds it fails, it never hangs)
//! - Bounded retries with exponential backoff on transient failures
//!   (connection refused or dropped, 502/503/504)
//! - Optional rate limiting
//! - TLS certificate validation disabled for self-signed management endpoints

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries on transient failures
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Accept self-signed or otherwise invalid certificates
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(600),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("array-xray/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: true,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the first retry delay and its ceiling
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: Option<RateLimiterConfig>) -> Self {
        self.config.rate_limit = config;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Credentials attached to every request
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication
    #[default]
    None,
    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl Credentials {
    /// Create basic credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::None => req,
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<JsonValue> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::malformed(format!(
                "HTTP {} body is not valid JSON ({e}): {}",
                self.status,
                truncate(&self.body, 200)
            ))
        })
    }
}

/// HTTP client with bounded retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credentials: Credentials,
    rate_limiter: Option<RateLimiter>,
    /// Label used in error messages (e.g. `VMAX(000295700220)`)
    target: String,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let target = config.base_url.clone().unwrap_or_default();

        Ok(Self {
            client,
            config,
            credentials: Credentials::None,
            rate_limiter,
            target,
        })
    }

    /// Attach credentials to every request
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Label the target in error messages
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Label used in error messages
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Issue a GET request, returning status and body whatever the status.
    ///
    /// Transient failures (connection refused or dropped, HTTP 502 to 504)
    /// are retried up to `max_retries` times with backoff; exhaustion is reported as [`Error::Connection`]. A timeout
    /// is reported as [`Error::Timeout`] without retry.
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.get(&url).timeout(self.config.timeout);
            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            req = self.credentials.apply(req);

            debug!("---> GET {path}");

            let failure = match req.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.text().await {
                        Ok(body) if !is_transient_status(status) => {
                            return Ok(HttpResponse { status, body });
                        }
                        Ok(body) => format!("HTTP {status} {}", truncate(&body, 200)),
                        Err(e) => self.transient_failure(e)?,
                    }
                }
                Err(e) => self.transient_failure(e)?,
            };

            if attempt >= max_retries {
                return Err(Error::connection(
                    &self.target,
                    format!(
                        "GET {path} failed after {} attempts: {failure}",
                        attempt + 1
                    ),
                ));
            }

            let delay = self.calculate_backoff(attempt);
            warn!(
                "Retry for {path}, attempt {}/{}, waiting {:?}: {failure}",
                attempt + 1,
                max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        std::cmp::min(
            self.config.initial_backoff.saturating_mul(factor),
            self.config.max_backoff,
        )
    }

    /// Message of a failure worth retrying, or the error to return at once
    fn transient_failure(&self, error: reqwest::Error) -> Result<String> {
        if error.is_timeout() {
            return Err(self.timeout_error());
        }
        if !is_transient(&error) {
            return Err(Error::connection(&self.target, error.to_string()));
        }
        Ok(error.to_string())
    }

    fn timeout_error(&self) -> Error {
        Error::Timeout {
            target: self.target.clone(),
            timeout_ms: self.config.timeout.as_millis() as u64,
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("target", &self.target)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Failures where the server was never reached or dropped the connection
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_request() || error.is_body()
}

/// Gateway answers of a management server that is restarting or overloaded
fn is_transient_status(status: u16) -> bool {
    matches!(status, 502..=504)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
