//! `SQLite` implementation of [`IdentityProvider`].
//!
//! Access tokens are HS256 JWTs signed with the refresh token's own key, so
//! removing a refresh token invalidates every access token derived from it.

use std::future::Future;

use chrono::TimeDelta;
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use vaultlink_app::ports::IdentityProvider;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::{IdentityId, RefreshTokenId};
use vaultlink_domain::identity::{AccessToken, RefreshToken, SystemIdentity};
use vaultlink_domain::time;
use vaultlink_domain::token::token_hex;

use crate::codec::{parse_id, parse_json, parse_timestamp};
use crate::error::StorageError;

/// Number of random bytes in a refresh token's signing key.
const JWT_KEY_BYTES: usize = 64;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Id of the refresh token the access token derives from.
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

struct IdentityRow(SystemIdentity);

impl<'r> FromRow<'r, SqliteRow> for IdentityRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let group_ids: String = row.try_get("group_ids")?;

        Ok(Self(SystemIdentity {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            group_ids: parse_json(&group_ids)?,
            system_generated: row.try_get("system_generated")?,
            is_active: row.try_get("is_active")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
        }))
    }
}

struct RefreshTokenRow(RefreshToken);

impl<'r> FromRow<'r, SqliteRow> for RefreshTokenRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let identity_id: String = row.try_get("identity_id")?;
        let expiration: i64 = row.try_get("access_token_expiration")?;
        let access_token_expiration = TimeDelta::try_seconds(expiration).ok_or_else(|| {
            sqlx::Error::Decode(format!("token lifetime {expiration}s out of range").into())
        })?;

        Ok(Self(RefreshToken {
            id: parse_id(&id)?,
            identity_id: parse_id(&identity_id)?,
            client_name: row.try_get("client_name")?,
            access_token_expiration,
            jwt_key: row.try_get("jwt_key")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
        }))
    }
}

const INSERT_IDENTITY: &str = "INSERT INTO identities (id, name, group_ids, system_generated, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_IDENTITY: &str = "SELECT * FROM identities WHERE id = ?";
const INSERT_REFRESH_TOKEN: &str = "INSERT INTO refresh_tokens (id, identity_id, client_name, access_token_expiration, jwt_key, created_at) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_REFRESH_TOKENS: &str =
    "SELECT * FROM refresh_tokens WHERE identity_id = ? ORDER BY created_at, id";
const DELETE_REFRESH_TOKEN: &str = "DELETE FROM refresh_tokens WHERE id = ?";

/// `SQLite`-backed host identities and refresh tokens.
#[derive(Clone)]
pub struct SqliteIdentityProvider {
    pool: SqlitePool,
}

impl SqliteIdentityProvider {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl IdentityProvider for SqliteIdentityProvider {
    fn get_identity(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<Option<SystemIdentity>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<IdentityRow> = sqlx::query_as(SELECT_IDENTITY)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn create_system_identity(
        &self,
        name: &str,
        group_ids: Vec<String>,
    ) -> impl Future<Output = Result<SystemIdentity, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let identity = SystemIdentity::new(name, group_ids);
        async move {
            let group_ids = serde_json::to_string(&identity.group_ids).map_err(StorageError::from)?;
            sqlx::query(INSERT_IDENTITY)
                .bind(identity.id.to_string())
                .bind(&identity.name)
                .bind(group_ids)
                .bind(identity.system_generated)
                .bind(identity.is_active)
                .bind(identity.created_at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(identity)
        }
    }

    fn create_refresh_token(
        &self,
        identity: &SystemIdentity,
        client_name: &str,
        access_token_expiration: TimeDelta,
    ) -> impl Future<Output = Result<RefreshToken, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        let token = RefreshToken {
            id: RefreshTokenId::new(),
            identity_id: identity.id,
            client_name: client_name.to_string(),
            access_token_expiration,
            jwt_key: token_hex(JWT_KEY_BYTES),
            created_at: time::now(),
        };
        async move {
            sqlx::query(INSERT_REFRESH_TOKEN)
                .bind(token.id.to_string())
                .bind(token.identity_id.to_string())
                .bind(&token.client_name)
                .bind(token.access_token_expiration.num_seconds())
                .bind(&token.jwt_key)
                .bind(token.created_at.timestamp())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(token)
        }
    }

    fn create_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<AccessToken, VaultLinkError> {
        let now = time::now();
        let claims = AccessTokenClaims {
            iss: refresh_token.id.to_string(),
            iat: now.timestamp(),
            exp: (now + refresh_token.access_token_expiration).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(refresh_token.jwt_key.as_bytes()),
        )
        .map_err(StorageError::from)?;

        Ok(AccessToken::new(token))
    }

    fn list_refresh_tokens(
        &self,
        identity_id: IdentityId,
    ) -> impl Future<Output = Result<Vec<RefreshToken>, VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<RefreshTokenRow> = sqlx::query_as(SELECT_REFRESH_TOKENS)
                .bind(identity_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn remove_refresh_token(
        &self,
        id: RefreshTokenId,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_REFRESH_TOKEN)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
