//! Device registry handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};

use vaultlink_app::ports::{ConfigEntryRepository, DeviceRepository};
use vaultlink_domain::device::Device;
use vaultlink_domain::error::{NotFoundError, VaultLinkError};
use vaultlink_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/devices`
pub async fn list<CR, DR>(
    State(state): State<AppState<CR, DR>>,
) -> Result<Json<Vec<Device>>, ApiError>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(Json(devices))
}

/// `GET /api/devices/{id}`
pub async fn get<CR, DR>(
    State(state): State<AppState<CR, DR>>,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::from_str(&id).map_err(|_| {
        VaultLinkError::from(NotFoundError {
            entity: "Device",
            id: id.clone(),
        })
    })?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(Json(device))
}
