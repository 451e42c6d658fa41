//! Storage port — repository traits for the host registries.

use std::future::Future;

use vaultlink_domain::config_entry::ConfigEntry;
use vaultlink_domain::device::Device;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::DeviceId;

/// Persistence for the device registry.
pub trait DeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, VaultLinkError>> + Send;

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, VaultLinkError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, VaultLinkError>> + Send;

    fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<Device>, VaultLinkError>> + Send;

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, VaultLinkError>> + Send;
}

/// Persistence for configured entries.
pub trait ConfigEntryRepository {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, VaultLinkError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, VaultLinkError>> + Send;

    fn find_by_unique_id(
        &self,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, VaultLinkError>> + Send;
}
