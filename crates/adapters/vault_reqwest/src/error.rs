//! Vault adapter error types.

use vaultlink_domain::error::{SecretsServerError, VaultLinkError};

/// Errors raised while building the Vault client.
#[derive(Debug, thiserror::Error)]
pub enum VaultClientError {
    /// The underlying reqwest client could not be built (TLS backend, …).
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The configured address cannot be used as a base URL.
    #[error("invalid Vault address {0:?}")]
    InvalidAddress(String),
}

impl From<VaultClientError> for VaultLinkError {
    fn from(err: VaultClientError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// The request could not be addressed, so it was never sent.
pub(crate) fn invalid_address(address: &str) -> SecretsServerError {
    SecretsServerError::Transport(Box::new(VaultClientError::InvalidAddress(
        address.to_string(),
    )))
}

/// Classify a reqwest failure that happened before a response was read.
pub(crate) fn transport(err: reqwest::Error) -> SecretsServerError {
    SecretsServerError::Transport(Box::new(err))
}
