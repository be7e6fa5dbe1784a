//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Upstream API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.freepik.com/v1";

/// Path prefix the relay forwards verbatim to the upstream host.
const RELAY_API_PREFIX: &str = "/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Picto.
const USER_AGENT: &str = concat!("Picto/", env!("CARGO_PKG_VERSION"));

/// Settings for [`crate::IconClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to. Always a valid URL.
    base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::direct()
    }
}

impl ClientConfig {
    /// Targets the upstream API directly.
    pub fn direct() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Targets a relay deployment, e.g. `https://relay.example.workers.dev`.
    pub fn via_relay(relay_url: &str) -> Result<Self, ApiError> {
        let base = format!("{}{}", relay_url.trim_end_matches('/'), RELAY_API_PREFIX);
        Self::direct().with_base_url(&base)
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            ApiError::InvalidParameter(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidParameter(format!(
                "base URL must be http or https: {base_url}"
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Joins an endpoint path onto the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
