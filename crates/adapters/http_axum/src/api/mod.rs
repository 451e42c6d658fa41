//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod config_flow;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod entries;

use axum::Router;
use axum::routing::get;

use vaultlink_app::ports::{ConfigEntryRepository, DeviceRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<CR, DR>() -> Router<AppState<CR, DR>>
where
    CR: ConfigEntryRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/config_flow",
            get(config_flow::show_form::<CR, DR>).post(config_flow::submit::<CR, DR>),
        )
        .route("/entries", get(entries::list::<CR, DR>))
        .route("/devices", get(devices::list::<CR, DR>))
        .route("/devices/{id}", get(devices::get::<CR, DR>))
}
