//! `SQLite` implementation of [`ConfigEntryRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use vaultlink_app::ports::ConfigEntryRepository;
use vaultlink_domain::config_entry::ConfigEntry;
use vaultlink_domain::error::VaultLinkError;

use crate::codec::{parse_id, parse_json, parse_timestamp, parse_u32};
use crate::error::StorageError;

struct Wrapper(ConfigEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let entry_id: String = row.try_get("entry_id")?;
        let data: String = row.try_get("data")?;

        Ok(Self(ConfigEntry {
            entry_id: parse_id(&entry_id)?,
            unique_id: row.try_get("unique_id")?,
            title: row.try_get("title")?,
            version: parse_u32(row.try_get("version")?)?,
            data: parse_json(&data)?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO config_entries (entry_id, unique_id, title, version, data, created_at) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_ALL: &str = "SELECT * FROM config_entries ORDER BY created_at, entry_id";
const SELECT_BY_UNIQUE_ID: &str = "SELECT * FROM config_entries WHERE unique_id = ?";

/// `SQLite`-backed store of configured entries.
///
/// Connection settings, password included, are kept as a JSON document.
#[derive(Clone)]
pub struct SqliteConfigEntryRepository {
    pool: SqlitePool,
}

impl SqliteConfigEntryRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ConfigEntryRepository for SqliteConfigEntryRepository {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let data = serde_json::to_string(&entry.data).map_err(StorageError::from)?;
            sqlx::query(INSERT)
                .bind(entry.entry_id.to_string())
                .bind(&entry.unique_id)
                .bind(&entry.title)
                .bind(i64::from(entry.version))
                .bind(data)
                .bind(entry.created_at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(entry)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_unique_id(
        &self,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let unique_id = unique_id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_UNIQUE_ID)
                .bind(unique_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use vaultlink_domain::config_entry::ConnectionConfig;

    async fn setup() -> SqliteConfigEntryRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteConfigEntryRepository::new(db.pool().clone())
    }

    fn entry(unique_id: &str) -> ConfigEntry {
        ConfigEntry::new(
            unique_id,
            ConnectionConfig {
                address: "https://vault.example.com".to_string(),
                username: "alice".to_string(),
                password: "hunter2".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn should_store_and_list_entries_with_connection_settings() {
        let repo = setup().await;
        let created = repo.create(entry("0a1b2c3d4e5f")).await.unwrap();

        let all = repo.get_all().await.unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].entry_id, created.entry_id);
        assert_eq!(all[0].data, created.data);
        assert_eq!(all[0].version, 1);
        assert_eq!(all[0].created_at.timestamp(), created.created_at.timestamp());
    }

    #[tokio::test]
    async fn should_find_entry_by_unique_id() {
        let repo = setup().await;
        let created = repo.create(entry("0a1b2c3d4e5f")).await.unwrap();

        let found = repo.find_by_unique_id("0a1b2c3d4e5f").await.unwrap();
        assert_eq!(found.map(|e| e.entry_id), Some(created.entry_id));
        assert!(repo.find_by_unique_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_reject_duplicate_unique_id() {
        let repo = setup().await;
        repo.create(entry("0a1b2c3d4e5f")).await.unwrap();

        let result = repo.create(entry("0a1b2c3d4e5f")).await;
        assert!(matches!(result, Err(VaultLinkError::Storage(_))));
    }
}
