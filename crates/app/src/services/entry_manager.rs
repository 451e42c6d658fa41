//! Entry manager — runs one [`VaultIntegration`] per config entry.
//!
//! Collaborators are cloned into every coordinator, so adapters are expected
//! to be cheap handles (`Arc`, pools, HTTP clients).

use std::time::Duration;

use vaultlink_domain::config_entry::ConfigEntry;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::EntryId;

use crate::ports::{
    DeviceRepository, ExternalUrl, IdentityProvider, Integration, KeyValueStore, SecretsServer,
};
use crate::services::credential_coordinator::{CredentialCoordinator, REFRESH_INTERVAL};
use crate::services::identity_service::IdentityService;
use crate::services::integration_context::ServiceContext;
use crate::services::vault_integration::VaultIntegration;

/// Per-entry behaviour shared by every managed integration.
#[derive(Debug, Clone, Copy)]
pub struct EntrySettings {
    pub refresh_interval: Duration,
    pub revoke_previous_tokens: bool,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            refresh_interval: REFRESH_INTERVAL,
            revoke_previous_tokens: false,
        }
    }
}

/// Owns the running integrations of this instance.
pub struct EntryManager<S, I, K, N, DR> {
    secrets: S,
    provider: I,
    store: K,
    network: N,
    ctx: ServiceContext<DR>,
    settings: EntrySettings,
    running: Vec<VaultIntegration<S, I, K, N>>,
}

impl<S, I, K, N, DR> EntryManager<S, I, K, N, DR>
where
    S: SecretsServer + Clone + 'static,
    I: IdentityProvider + Clone + 'static,
    K: KeyValueStore + Clone + 'static,
    N: ExternalUrl + Clone + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    pub fn new(
        secrets: S,
        provider: I,
        store: K,
        network: N,
        ctx: ServiceContext<DR>,
        settings: EntrySettings,
    ) -> Self {
        Self {
            secrets,
            provider,
            store,
            network,
            ctx,
            settings,
            running: Vec::new(),
        }
    }

    /// Set up `entry` and start its refresh loop.
    ///
    /// Starting an entry that is already running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the setup error when the host token or device registration
    /// fails; the entry is then not running.
    #[tracing::instrument(skip(self, entry), fields(entry_id = %entry.entry_id))]
    pub async fn start_entry(&mut self, entry: ConfigEntry) -> Result<(), VaultLinkError> {
        if self.is_running(entry.entry_id) {
            tracing::debug!("entry already running");
            return Ok(());
        }

        let identities = IdentityService::new(self.provider.clone(), self.store.clone())
            .with_revoke_previous_tokens(self.settings.revoke_previous_tokens);
        let coordinator = CredentialCoordinator::new(
            entry,
            self.secrets.clone(),
            identities,
            self.network.clone(),
        );
        let mut integration =
            VaultIntegration::new(coordinator).with_refresh_interval(self.settings.refresh_interval);

        integration.setup(&self.ctx).await?;
        integration.start_background().await?;
        self.running.push(integration);
        Ok(())
    }

    /// Start every entry, logging the ones that fail to set up.
    pub async fn start_all(&mut self, entries: Vec<ConfigEntry>) {
        for entry in entries {
            let entry_id = entry.entry_id;
            if let Err(err) = self.start_entry(entry).await {
                tracing::error!(%entry_id, error = %err, "entry setup failed");
            }
        }
    }

    #[must_use]
    pub fn is_running(&self, entry_id: EntryId) -> bool {
        self.running
            .iter()
            .any(|i| i.coordinator().entry().entry_id == entry_id)
    }

    #[must_use]
    pub fn running(&self) -> &[VaultIntegration<S, I, K, N>] {
        &self.running
    }

    /// Tear down every running integration.
    pub async fn shutdown(&mut self) {
        for mut integration in self.running.drain(..) {
            if let Err(err) = integration.teardown().await {
                tracing::warn!(
                    entry_id = %integration.coordinator().entry().entry_id,
                    error = %err,
                    "teardown failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::StaticExternalUrl;
    use crate::services::device_service::DeviceService;
    use crate::testing::{
        FakeSecretsServer, InMemoryDeviceRepo, InMemoryIdentityProvider, InMemoryKeyValueStore,
        LoginBehavior, connection_config,
    };

    type Manager = EntryManager<
        Arc<FakeSecretsServer>,
        Arc<InMemoryIdentityProvider>,
        Arc<InMemoryKeyValueStore>,
        StaticExternalUrl,
        InMemoryDeviceRepo,
    >;

    struct Fixture {
        secrets: Arc<FakeSecretsServer>,
        provider: Arc<InMemoryIdentityProvider>,
        devices: Arc<DeviceService<InMemoryDeviceRepo>>,
    }

    impl Fixture {
        fn new(login: LoginBehavior) -> Self {
            Self {
                secrets: Arc::new(FakeSecretsServer::new(login)),
                provider: Arc::new(InMemoryIdentityProvider::default()),
                devices: Arc::new(DeviceService::new(InMemoryDeviceRepo::default())),
            }
        }

        fn manager(&self, network: StaticExternalUrl) -> Manager {
            EntryManager::new(
                Arc::clone(&self.secrets),
                Arc::clone(&self.provider),
                Arc::new(InMemoryKeyValueStore::default()),
                network,
                ServiceContext::new(Arc::clone(&self.devices)),
                EntrySettings {
                    refresh_interval: Duration::from_secs(3600),
                    revoke_previous_tokens: false,
                },
            )
        }
    }

    fn external_url() -> StaticExternalUrl {
        StaticExternalUrl::new(Some("https://home.example.com".to_string()))
    }

    #[tokio::test]
    async fn should_start_each_entry_once() {
        let fixture = Fixture::new(LoginBehavior::Succeed("hvs.one".to_string()));
        let mut manager = fixture.manager(external_url());
        let entry = ConfigEntry::new("0a1b2c3d4e5f", connection_config());

        manager.start_entry(entry.clone()).await.unwrap();
        manager.start_entry(entry.clone()).await.unwrap();

        assert_eq!(manager.running().len(), 1);
        assert!(manager.is_running(entry.entry_id));
        assert!(manager.running()[0].is_refreshing());
        assert_eq!(fixture.secrets.publish_calls().len(), 1);
    }

    #[tokio::test]
    async fn should_share_identity_between_entries() {
        let fixture = Fixture::new(LoginBehavior::Succeed("hvs.one".to_string()));
        let mut manager = fixture.manager(external_url());

        manager
            .start_all(vec![
                ConfigEntry::new("aaaaaaaaaaaa", connection_config()),
                ConfigEntry::new("bbbbbbbbbbbb", connection_config()),
            ])
            .await;

        assert_eq!(manager.running().len(), 2);
        assert_eq!(fixture.provider.identity_count(), 1);
        assert_eq!(fixture.devices.list_devices().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_keep_running_entry_when_publish_has_no_url() {
        let fixture = Fixture::new(LoginBehavior::Succeed("hvs.one".to_string()));
        let mut manager = fixture.manager(StaticExternalUrl::new(None));

        manager
            .start_entry(ConfigEntry::new("0a1b2c3d4e5f", connection_config()))
            .await
            .unwrap();

        assert_eq!(manager.running().len(), 1);
        assert!(fixture.secrets.publish_calls().is_empty());
    }

    #[tokio::test]
    async fn should_not_run_entry_whose_device_is_invalid() {
        let fixture = Fixture::new(LoginBehavior::Succeed("hvs.one".to_string()));
        let mut manager = fixture.manager(external_url());

        let result = manager
            .start_entry(ConfigEntry::new("", connection_config()))
            .await;

        assert!(matches!(result, Err(VaultLinkError::Validation(_))));
        assert!(manager.running().is_empty());
    }

    #[tokio::test]
    async fn should_stop_all_entries_on_shutdown() {
        let fixture = Fixture::new(LoginBehavior::Succeed("hvs.one".to_string()));
        let mut manager = fixture.manager(external_url());
        manager
            .start_entry(ConfigEntry::new("0a1b2c3d4e5f", connection_config()))
            .await
            .unwrap();

        manager.shutdown().await;

        assert!(manager.running().is_empty());
    }
}
