//! Vault HTTP client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for [`VaultHttpClient`](crate::VaultHttpClient).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VaultClientConfig {
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl VaultClientConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for VaultClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: concat!("vaultlink/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
