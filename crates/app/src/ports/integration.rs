//! Integration port — lifecycle of a configured integration entry.
//!
//! An integration bridges an external service into the host. It registers
//! its devices on setup, runs background work while the host is up, and
//! cleans up on shutdown.

use std::future::Future;

use vaultlink_domain::device::Device;
use vaultlink_domain::error::VaultLinkError;

/// Host services offered to integrations during setup.
///
/// This is a **port** — the binary crate provides a concrete implementation
/// backed by `DeviceService`.
pub trait IntegrationContext: Send + Sync {
    /// Register a device (create, or update by `integration`+`unique_id`).
    fn upsert_device(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, VaultLinkError>> + Send;
}

/// A pluggable integration, one instance per config entry.
///
/// The binary crate calls the lifecycle methods in order:
///
/// 1. [`setup`](Self::setup) — initialise and register devices
/// 2. [`start_background`](Self::start_background) — spawn long-running tasks
/// 3. [`teardown`](Self::teardown) — clean up resources
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"vault"`).
    fn name(&self) -> &'static str;

    /// Initialise the entry. An error here means setup failed.
    fn setup(
        &mut self,
        ctx: &impl IntegrationContext,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send;

    /// Start long-running background work. The default is a no-op.
    fn start_background(&mut self) -> impl Future<Output = Result<(), VaultLinkError>> + Send {
        async { Ok(()) }
    }

    /// Called on graceful shutdown.
    fn teardown(&mut self) -> impl Future<Output = Result<(), VaultLinkError>> + Send;
}
