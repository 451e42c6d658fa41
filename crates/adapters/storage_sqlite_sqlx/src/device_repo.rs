//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use vaultlink_app::ports::DeviceRepository;
use vaultlink_domain::device::Device;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::{DeviceId, EntryId};

use crate::codec::parse_id;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let config_entry_id: Option<String> = row.try_get("config_entry_id")?;

        Ok(Self(Device {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            integration: row.try_get("integration")?,
            unique_id: row.try_get("unique_id")?,
            config_entry_id: config_entry_id
                .as_deref()
                .map(parse_id::<EntryId>)
                .transpose()?,
            model: row.try_get("model")?,
            manufacturer: row.try_get("manufacturer")?,
            sw_version: row.try_get("sw_version")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO devices (id, name, integration, unique_id, config_entry_id, model, manufacturer, sw_version) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY name";
const SELECT_BY_INTEGRATION_UNIQUE_ID: &str =
    "SELECT * FROM devices WHERE integration = ? AND unique_id = ?";
const UPDATE: &str = "UPDATE devices SET name = ?, integration = ?, unique_id = ?, config_entry_id = ?, model = ?, manufacturer = ?, sw_version = ? WHERE id = ?";

/// `SQLite`-backed device registry.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(device.id.to_string())
                .bind(&device.name)
                .bind(&device.integration)
                .bind(&device.unique_id)
                .bind(device.config_entry_id.map(|id| id.to_string()))
                .bind(&device.model)
                .bind(&device.manufacturer)
                .bind(&device.sw_version)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<Device>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let integration = integration.to_string();
        let unique_id = unique_id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_INTEGRATION_UNIQUE_ID)
                .bind(integration)
                .bind(unique_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(&device.name)
                .bind(&device.integration)
                .bind(&device.unique_id)
                .bind(device.config_entry_id.map(|id| id.to_string()))
                .bind(&device.model)
                .bind(&device.manufacturer)
                .bind(&device.sw_version)
                .bind(device.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device)
        }
    }
}
