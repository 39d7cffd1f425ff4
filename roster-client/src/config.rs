//! Client configuration
//!
//! | Environment variable | Default | Meaning |
//! |----------------------|---------|---------|
//! | ROSTER_API_URL | http://localhost:8080 | Backend origin (`/api` is appended) |
//! | ROSTER_TIMEOUT_SECS | 10 | Per-request timeout |
//! | ROSTER_CACHE_TTL_SECS | 300 | Freshness window of cached reads |

use std::time::Duration;

use crate::api::HttpEmployeeApi;
use crate::error::ClientResult;
use crate::http::NetworkHttpClient;
use crate::store::EmployeeStore;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Client configuration for connecting to the employee API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// How long a successful fetch is served from cache
    pub freshness: Duration,
}

impl ClientConfig {
    /// Create a configuration with default timeout and freshness
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            freshness: DEFAULT_FRESHNESS,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("ROSTER_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = std::env::var("ROSTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let freshness = std::env::var("ROSTER_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FRESHNESS);

        Self {
            base_url,
            timeout,
            freshness,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cache freshness window
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Base of all resource paths: origin + `/api`
    pub fn api_base(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }

    /// Create a synchronized employee store backed by the network client
    pub fn build_store(&self) -> ClientResult<EmployeeStore<HttpEmployeeApi>> {
        let api = HttpEmployeeApi::new(self.build_http_client()?);
        Ok(EmployeeStore::new(api, self))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
