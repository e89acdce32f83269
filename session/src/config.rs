//! Gateway configuration.
//!
//! The backend origin is the only required setting. Values come from the
//! application or from the environment via [`GatewayConfig::from_env`].

use std::time::Duration;

/// Origin used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable holding the backend origin.
pub const API_URL_ENV: &str = "RELIEF_OPS_API_URL";

/// Environment variable holding an optional request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "RELIEF_OPS_REQUEST_TIMEOUT_SECS";

/// Identity gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Backend origin (e.g., "http://localhost:8080").
    ///
    /// Request paths such as `/api/users/me` are appended to it.
    pub api_url: String,

    /// Per-request timeout.
    ///
    /// Default: none. A hung request keeps the session loading until it
    /// resolves.
    pub request_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Create a configuration for the given backend origin.
    #[must_use]
    pub const fn new(api_url: String) -> Self {
        Self {
            api_url,
            request_timeout: None,
        }
    }

    /// Set a per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source, keyed like
    /// [`GatewayConfig::from_env`].
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = lookup(REQUEST_TIMEOUT_ENV)
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            api_url,
            request_timeout,
        }
    }

    /// Join a request path onto the configured origin.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string())
    }
}
