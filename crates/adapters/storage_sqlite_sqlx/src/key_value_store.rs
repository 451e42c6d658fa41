//! `SQLite` implementation of [`KeyValueStore`].

use std::future::Future;

use sqlx::SqlitePool;

use vaultlink_app::ports::KeyValueStore;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::time;

use crate::codec::parse_json;
use crate::error::StorageError;

const SELECT_BY_KEY: &str = "SELECT data FROM key_value WHERE key = ?";
const UPSERT: &str = "INSERT INTO key_value (key, version, data, updated_at) VALUES (?, ?, ?, ?) \
     ON CONFLICT (key) DO UPDATE SET version = excluded.version, data = excluded.data, updated_at = excluded.updated_at";

/// `SQLite`-backed versioned JSON documents.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_BY_KEY)
                .bind(key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let value = row
                .map(|(data,)| parse_json(&data))
                .transpose()
                .map_err(StorageError::from)?;
            Ok(value)
        }
    }

    fn save(
        &self,
        key: &str,
        version: u32,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            sqlx::query(UPSERT)
                .bind(&key)
                .bind(i64::from(version))
                .bind(data.to_string())
                .bind(time::now().timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            tracing::debug!(%key, version, "key-value record saved");
            Ok(())
        }
    }
}
