//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use vaultlink_app::services::config_flow::ConfigFlow;
use vaultlink_app::services::device_service::DeviceService;
use vaultlink_domain::config_entry::ConfigEntry;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the repositories do not need to be
/// `Clone`; only the `Arc` wrappers and the channel sender are cloned.
pub struct AppState<CR, DR> {
    pub config_flow: Arc<ConfigFlow<CR>>,
    pub device_service: Arc<DeviceService<DR>>,
    /// Receives every entry created through the config flow.
    pub new_entries: mpsc::Sender<ConfigEntry>,
}

impl<CR, DR> Clone for AppState<CR, DR> {
    fn clone(&self) -> Self {
        Self {
            config_flow: Arc::clone(&self.config_flow),
            device_service: Arc::clone(&self.device_service),
            new_entries: self.new_entries.clone(),
        }
    }
}

impl<CR, DR> AppState<CR, DR> {
    pub fn new(
        config_flow: ConfigFlow<CR>,
        device_service: Arc<DeviceService<DR>>,
        new_entries: mpsc::Sender<ConfigEntry>,
    ) -> Self {
        Self {
            config_flow: Arc::new(config_flow),
            device_service,
            new_entries,
        }
    }
}
