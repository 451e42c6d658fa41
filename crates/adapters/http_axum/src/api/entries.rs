//! Config entry handlers.

use axum::Json;
use axum::extract::State;

use vaultlink_app::ports::{ConfigEntryRepository, DeviceRepository};
use vaultlink_domain::config_entry::ConfigEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/entries` (passwords redacted)
pub async fn list<CR, DR>(
    State(state): State<AppState<CR, DR>>,
) -> Result<Json<Vec<ConfigEntry>>, ApiError>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    let entries = state.config_flow.list_entries().await?;
    Ok(Json(entries.iter().map(ConfigEntry::redacted).collect()))
}
