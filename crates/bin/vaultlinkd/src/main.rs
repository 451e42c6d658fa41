//! # vaultlinkd — vaultlink daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct adapters and application services
//! - Set up every stored Vault entry and start its refresh loop
//! - Serve the HTTP API and set up entries created through it
//! - Tear every entry down on SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use vaultlink_adapter_http_axum::state::AppState;
use vaultlink_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteConfigEntryRepository, SqliteDeviceRepository,
    SqliteIdentityProvider, SqliteKeyValueStore,
};
use vaultlink_adapter_vault_reqwest::{VaultClientConfig, VaultHttpClient};
use vaultlink_app::ports::{ConfigEntryRepository, StaticExternalUrl};
use vaultlink_app::services::config_flow::ConfigFlow;
use vaultlink_app::services::device_service::DeviceService;
use vaultlink_app::services::entry_manager::{EntryManager, EntrySettings};
use vaultlink_app::services::integration_context::ServiceContext;
use vaultlink_domain::config_entry::ConfigEntry;

use crate::config::Config;

type Manager = EntryManager<
    VaultHttpClient,
    SqliteIdentityProvider,
    SqliteKeyValueStore,
    StaticExternalUrl,
    SqliteDeviceRepository,
>;

/// Entries created through the API and waiting to be set up.
const NEW_ENTRY_BUFFER: usize = 16;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories and clients
    let entry_repo = SqliteConfigEntryRepository::new(pool.clone());
    let device_repo = SqliteDeviceRepository::new(pool.clone());
    let identity_provider = SqliteIdentityProvider::new(pool.clone());
    let key_value = SqliteKeyValueStore::new(pool);
    let vault_client = VaultHttpClient::new(&VaultClientConfig {
        request_timeout_secs: config.vault.request_timeout_secs,
        ..VaultClientConfig::default()
    })?;
    let external_url = StaticExternalUrl::new(config.host.external_url.clone());
    if config.host.external_url.is_none() {
        tracing::warn!("no external URL configured, connection info will not be published");
    }

    // Services
    let device_service = Arc::new(DeviceService::new(device_repo));
    let manager = EntryManager::new(
        vault_client,
        identity_provider,
        key_value,
        external_url,
        ServiceContext::new(Arc::clone(&device_service)),
        EntrySettings {
            refresh_interval: config.vault.refresh_interval(),
            revoke_previous_tokens: config.vault.revoke_previous_tokens,
        },
    );

    let stored_entries = entry_repo.get_all().await?;
    tracing::info!(count = stored_entries.len(), "loaded config entries");

    // The channel closes once the HTTP server has shut down, which ends the
    // entry task and tears every integration down.
    let (new_entries_tx, new_entries_rx) = mpsc::channel(NEW_ENTRY_BUFFER);
    let entries_task = tokio::spawn(run_entries(manager, stored_entries, new_entries_rx));

    // HTTP
    let state = AppState::new(ConfigFlow::new(entry_repo), device_service, new_entries_tx);
    let app = vaultlink_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "vaultlinkd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    entries_task.await?;
    tracing::info!("vaultlinkd stopped");
    Ok(())
}

/// Set up stored entries, then every entry received until the channel closes.
async fn run_entries(
    mut manager: Manager,
    stored: Vec<ConfigEntry>,
    mut new_entries: mpsc::Receiver<ConfigEntry>,
) {
    manager.start_all(stored).await;

    while let Some(entry) = new_entries.recv().await {
        let entry_id = entry.entry_id;
        if let Err(err) = manager.start_entry(entry).await {
            tracing::error!(%entry_id, error = %err, "entry setup failed");
        }
    }

    manager.shutdown().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
