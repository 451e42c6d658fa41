//! # vaultlink-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the storage, identity and key-value ports defined in `vaultlink-app`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run embedded migrations
//! - Sign access tokens as HS256 JWTs with each refresh token's key
//!
//! ## Dependency rule
//! Depends on `vaultlink-app` (for port traits) and `vaultlink-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;
mod config_entry_repo;
mod device_repo;
mod error;
mod identity_provider;
mod key_value_store;
mod pool;

pub use config_entry_repo::SqliteConfigEntryRepository;
pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use identity_provider::{AccessTokenClaims, SqliteIdentityProvider};
pub use key_value_store::SqliteKeyValueStore;
pub use pool::{Config, Database};
