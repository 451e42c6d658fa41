//! Identity port — the host's auth subsystem.

use std::future::Future;
use std::sync::Arc;

use chrono::TimeDelta;

use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::{IdentityId, RefreshTokenId};
use vaultlink_domain::identity::{AccessToken, RefreshToken, SystemIdentity};

/// Creates and looks up system identities and the tokens issued for them.
pub trait IdentityProvider: Send + Sync {
    fn get_identity(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<Option<SystemIdentity>, VaultLinkError>> + Send;

    fn create_system_identity(
        &self,
        name: &str,
        group_ids: Vec<String>,
    ) -> impl Future<Output = Result<SystemIdentity, VaultLinkError>> + Send;

    /// Issue a refresh token whose derived access tokens live for
    /// `access_token_expiration`.
    fn create_refresh_token(
        &self,
        identity: &SystemIdentity,
        client_name: &str,
        access_token_expiration: TimeDelta,
    ) -> impl Future<Output = Result<RefreshToken, VaultLinkError>> + Send;

    /// Derive a signed access token from `refresh_token`. Pure computation.
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::Storage`] if signing fails.
    fn create_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<AccessToken, VaultLinkError>;

    fn list_refresh_tokens(
        &self,
        identity_id: IdentityId,
    ) -> impl Future<Output = Result<Vec<RefreshToken>, VaultLinkError>> + Send;

    fn remove_refresh_token(
        &self,
        id: RefreshTokenId,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send;
}

impl<T: IdentityProvider> IdentityProvider for Arc<T> {
    fn get_identity(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<Option<SystemIdentity>, VaultLinkError>> + Send {
        (**self).get_identity(id)
    }

    fn create_system_identity(
        &self,
        name: &str,
        group_ids: Vec<String>,
    ) -> impl Future<Output = Result<SystemIdentity, VaultLinkError>> + Send {
        (**self).create_system_identity(name, group_ids)
    }

    fn create_refresh_token(
        &self,
        identity: &SystemIdentity,
        client_name: &str,
        access_token_expiration: TimeDelta,
    ) -> impl Future<Output = Result<RefreshToken, VaultLinkError>> + Send {
        (**self).create_refresh_token(identity, client_name, access_token_expiration)
    }

    fn create_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<AccessToken, VaultLinkError> {
        (**self).create_access_token(refresh_token)
    }

    fn list_refresh_tokens(
        &self,
        identity_id: IdentityId,
    ) -> impl Future<Output = Result<Vec<RefreshToken>, VaultLinkError>> + Send {
        (**self).list_refresh_tokens(identity_id)
    }

    fn remove_refresh_token(
        &self,
        id: RefreshTokenId,
    ) -> impl Future<Output = Result<(), VaultLinkError>> + Send {
        (**self).remove_refresh_token(id)
    }
}
