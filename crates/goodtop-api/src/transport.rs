// Transport configuration for building reqwest::Client instances.
//
// Every public client operation builds a fresh HTTP client from this config
// and drops it on return; there is no session reuse across calls, so
// overlapping fetches and mutations never share state.

use std::time::Duration;

use crate::error::Error;

/// Default per-request timeout. The firmware's CGI handlers are slow but
/// answer well inside this bound when the device is up at all.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration shared by all requests of one client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Create a config with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("goodtop-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;
        Ok(client)
    }
}
