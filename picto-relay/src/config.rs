//! Relay settings.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::error::RelayError;

/// Upstream origin requests are forwarded to.
pub const DEFAULT_UPSTREAM: &str = "https://api.freepik.com";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default upstream timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Relay settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the relay listens on.
    pub listen: SocketAddr,
    /// Upstream origin, without a trailing slash.
    upstream: String,
    /// Timeout for each upstream request.
    pub timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            upstream: DEFAULT_UPSTREAM.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RelayConfig {
    /// Sets the listen address.
    #[must_use]
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    /// Sets the upstream origin. Must be an absolute http(s) URL.
    pub fn with_upstream(mut self, upstream: &str) -> Result<Self, RelayError> {
        let parsed = Url::parse(upstream)
            .map_err(|e| RelayError::Config(format!("invalid upstream '{upstream}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "upstream must be http or https: {upstream}"
            )));
        }
        self.upstream = upstream.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Sets the upstream timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the upstream origin.
    pub fn upstream(&self) -> &str {
        &self.upstream
    }
}
