//! Storage-specific error type wrapping sqlx errors.

use vaultlink_domain::error::VaultLinkError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to (de)serialize a stored JSON value.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Failed to sign an access token.
    #[error("token signing error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<StorageError> for VaultLinkError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_as_storage_error() {
        let err: VaultLinkError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, VaultLinkError::Storage(_)));
    }
}
