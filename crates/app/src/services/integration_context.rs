//! Concrete [`IntegrationContext`] backed by application services.

use std::sync::Arc;

use vaultlink_domain::device::Device;
use vaultlink_domain::error::VaultLinkError;

use crate::ports::{DeviceRepository, IntegrationContext};
use crate::services::device_service::DeviceService;

/// [`IntegrationContext`] implementation that delegates to `DeviceService`.
///
/// Wraps an `Arc`-ed service so it is cheaply cloneable and `Send + Sync`.
/// The generic parameter is confined to this struct — integrations see
/// only the [`IntegrationContext`] trait.
pub struct ServiceContext<DR> {
    device_service: Arc<DeviceService<DR>>,
}

impl<DR> ServiceContext<DR> {
    /// Create a new context backed by the given device service.
    pub fn new(device_service: Arc<DeviceService<DR>>) -> Self {
        Self { device_service }
    }
}

impl<DR> Clone for ServiceContext<DR> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<DR> IntegrationContext for ServiceContext<DR>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    async fn upsert_device(&self, device: Device) -> Result<Device, VaultLinkError> {
        self.device_service.upsert_device(device).await
    }
}
