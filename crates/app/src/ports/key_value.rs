//! Key-value port — small versioned JSON records that survive restarts.

use std::future::Future;
use std::sync::Arc;

use vaultlink_domain::error::VaultLinkError;

/// Persists one JSON document per key.
pub trait KeyValueStore: Send + Sync {
    /// Load the document stored under `key`, if any.
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, VaultLinkError>> + Send;

    /// Replace the document stored under `key`.
    fn save(
        &self,
        key: &str,
        version: u32,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, VaultLinkError>> + Send {
        (**self).load(key)
    }

    fn save(
        &self,
        key: &str,
        version: u32,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send {
        (**self).save(key, version, data)
    }
}
