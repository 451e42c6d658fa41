//! Network port — resolves how this instance is reachable from outside.

use std::sync::Arc;

use vaultlink_domain::error::SyncError;

/// Source of the instance's externally reachable URL.
pub trait ExternalUrl: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SyncError::NoUrlAvailable`] when no external URL is configured.
    fn external_url(&self) -> Result<String, SyncError>;
}

impl<T: ExternalUrl> ExternalUrl for Arc<T> {
    fn external_url(&self) -> Result<String, SyncError> {
        (**self).external_url()
    }
}

/// An [`ExternalUrl`] fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticExternalUrl(Option<String>);

impl StaticExternalUrl {
    #[must_use]
    pub fn new(url: Option<String>) -> Self {
        Self(url.filter(|u| !u.trim().is_empty()))
    }
}

impl ExternalUrl for StaticExternalUrl {
    fn external_url(&self) -> Result<String, SyncError> {
        self.0.clone().ok_or(SyncError::NoUrlAvailable)
    }
}
