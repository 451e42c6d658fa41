//! Configuration flow handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use vaultlink_app::ports::{ConfigEntryRepository, DeviceRepository};
use vaultlink_app::services::config_flow::{FlowForm, FlowInput};
use vaultlink_domain::config_entry::ConfigEntry;

use crate::error::ApiError;
use crate::state::AppState;

pub enum SubmitResponse {
    Created(Json<ConfigEntry>),
}

impl IntoResponse for SubmitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/config_flow`
pub async fn show_form<CR, DR>(State(state): State<AppState<CR, DR>>) -> Json<FlowForm>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    Json(state.config_flow.show_form())
}

/// `POST /api/config_flow`
///
/// The entry is stored first; a daemon that stopped listening only delays
/// its setup until the next start.
pub async fn submit<CR, DR>(
    State(state): State<AppState<CR, DR>>,
    Json(input): Json<FlowInput>,
) -> Result<SubmitResponse, ApiError>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    let entry = state.config_flow.submit(input).await?;
    if state.new_entries.send(entry.clone()).await.is_err() {
        tracing::warn!(entry_id = %entry.entry_id, "entry stored but no one is listening for new entries");
    }
    Ok(SubmitResponse::Created(Json(entry.redacted())))
}
