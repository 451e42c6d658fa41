//! The Vault integration — setup entry point for one config entry.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use vaultlink_domain::config_entry::{ConfigEntry, DOMAIN};
use vaultlink_domain::device::Device;
use vaultlink_domain::error::VaultLinkError;

use crate::ports::{
    ExternalUrl, IdentityProvider, Integration, IntegrationContext, KeyValueStore, SecretsServer,
};
use crate::services::credential_coordinator::{CredentialCoordinator, REFRESH_INTERVAL};

const DEVICE_NAME: &str = "Vault";
const DEVICE_MODEL: &str = "Vault";
const DEVICE_SW_VERSION: &str = "1.00";
const DEVICE_MANUFACTURER: &str = "@jadson179";

/// Build the registry device representing `entry`.
///
/// # Errors
///
/// Returns [`VaultLinkError::Validation`] if the entry has an empty unique id.
pub fn vault_device(entry: &ConfigEntry) -> Result<Device, VaultLinkError> {
    Device::builder()
        .name(DEVICE_NAME)
        .integration(DOMAIN)
        .unique_id(entry.unique_id.clone())
        .config_entry_id(entry.entry_id)
        .model(DEVICE_MODEL)
        .sw_version(DEVICE_SW_VERSION)
        .manufacturer(DEVICE_MANUFACTURER)
        .build()
}

/// Runs the coordinator for one entry through the integration lifecycle.
pub struct VaultIntegration<S, I, K, N> {
    coordinator: Arc<CredentialCoordinator<S, I, K, N>>,
    refresh_interval: Duration,
    refresh_handle: Option<JoinHandle<()>>,
}

impl<S, I, K, N> VaultIntegration<S, I, K, N> {
    /// Wrap a coordinator, refreshing every [`REFRESH_INTERVAL`].
    pub fn new(coordinator: CredentialCoordinator<S, I, K, N>) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            refresh_interval: REFRESH_INTERVAL,
            refresh_handle: None,
        }
    }

    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<CredentialCoordinator<S, I, K, N>> {
        &self.coordinator
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_handle.is_some()
    }
}

impl<S, I, K, N> Integration for VaultIntegration<S, I, K, N>
where
    S: SecretsServer + 'static,
    I: IdentityProvider + 'static,
    K: KeyValueStore + 'static,
    N: ExternalUrl + 'static,
{
    fn name(&self) -> &'static str {
        DOMAIN
    }

    /// First refresh, host token, device registration, then one publish.
    ///
    /// Only the host token and device registration are fatal; login and
    /// publish failures leave the entry running in a degraded state until
    /// the next refresh.
    async fn setup(&mut self, ctx: &impl IntegrationContext) -> Result<(), VaultLinkError> {
        let entry_id = self.coordinator.entry().entry_id;

        if self.coordinator.authenticate().await.is_err() {
            tracing::warn!(%entry_id, "first refresh failed, continuing setup");
        }

        self.coordinator.ensure_host_identity().await?;
        ctx.upsert_device(vault_device(self.coordinator.entry())?)
            .await?;

        if self.coordinator.publish_connection_info().await.is_err() {
            tracing::warn!(%entry_id, "connection info not published during setup");
        }

        tracing::info!(%entry_id, "vault entry set up");
        Ok(())
    }

    async fn start_background(&mut self) -> Result<(), VaultLinkError> {
        if self.refresh_handle.is_none() {
            self.refresh_handle = Some(self.coordinator.spawn_refresh_loop(self.refresh_interval));
            tracing::info!(
                entry_id = %self.coordinator.entry().entry_id,
                interval_secs = self.refresh_interval.as_secs(),
                "vault refresh loop started"
            );
        }
        Ok(())
    }

    async fn teardown(&mut self) -> Result<(), VaultLinkError> {
        if let Some(handle) = self.refresh_handle.take() {
            handle.abort();
            tracing::debug!("vault refresh task aborted");
        }
        tracing::info!(entry_id = %self.coordinator.entry().entry_id, "vault entry unloaded");
        Ok(())
    }
}
