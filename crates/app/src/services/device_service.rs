//! Device service — use-cases for the host device registry.

use vaultlink_domain::device::Device;
use vaultlink_domain::error::{NotFoundError, VaultLinkError};
use vaultlink_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Application service for the device registry.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, VaultLinkError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, VaultLinkError> {
        self.repo.get_all().await
    }

    /// Get or create a device by its `(integration, unique_id)` pair.
    ///
    /// If a device with the same integration and unique id already exists, its
    /// name, model, manufacturer, software version and config entry are
    /// refreshed (preserving the original id). Otherwise a new device is created.
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name, unique_id = %device.unique_id))]
    pub async fn upsert_device(&self, device: Device) -> Result<Device, VaultLinkError> {
        device.validate()?;
        if let Some(existing) = self
            .repo
            .find_by_integration_unique_id(&device.integration, &device.unique_id)
            .await?
        {
            let updated = Device {
                id: existing.id,
                ..device
            };
            return self.repo.update(updated).await;
        }
        tracing::info!("registering new device");
        self.repo.create(device).await
    }
}
