//! HTTP client utilities.

use reqwest::Client;
use std::time::Duration;

/// Default per-request timeout for page fetches
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for page fetches.
///
/// Idle connections are never kept, so each request opens and releases its
/// own connection.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default user agent
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(default_user_agent(), timeout)
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// User agent sent when none is configured
pub fn default_user_agent() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}
