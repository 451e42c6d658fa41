//! Identity service — obtains the integration's system identity and mints
//! access tokens for it.

use vaultlink_domain::config_entry::DOMAIN;
use vaultlink_domain::error::VaultLinkError;
use vaultlink_domain::id::{IdentityId, RefreshTokenId};
use vaultlink_domain::identity::{
    AccessToken, GROUP_ID_ADMIN, IDENTITY_NAME, IdentityRecord, SystemIdentity, TOKEN_CLIENT_NAME,
};
use vaultlink_domain::time;

use crate::ports::{IdentityProvider, KeyValueStore};

/// Key under which the identity reference is stored.
pub const STORAGE_KEY: &str = DOMAIN;

/// Version of the stored identity record.
pub const STORAGE_VERSION: u32 = 1;

/// An access token together with the refresh token it was derived from.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub refresh_token_id: RefreshTokenId,
    pub access_token: AccessToken,
}

/// Application service for the integration's host identity.
pub struct IdentityService<I, K> {
    provider: I,
    store: K,
    revoke_previous_tokens: bool,
}

impl<I, K> IdentityService<I, K>
where
    I: IdentityProvider,
    K: KeyValueStore,
{
    /// Create a service that never revokes older refresh tokens.
    pub fn new(provider: I, store: K) -> Self {
        Self {
            provider,
            store,
            revoke_previous_tokens: false,
        }
    }

    /// Remove every other refresh token of the identity each time a new one is issued.
    #[must_use]
    pub fn with_revoke_previous_tokens(mut self, revoke: bool) -> Self {
        self.revoke_previous_tokens = revoke;
        self
    }

    /// Return the stored identity, creating and remembering one if needed.
    ///
    /// A stored reference to an identity that no longer exists is replaced.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be read, decoded or
    /// saved, or if the provider fails.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_identity(&self) -> Result<SystemIdentity, VaultLinkError> {
        let mut record = self.load_record().await?;

        if let Some(id) = record.vault_user {
            if let Some(identity) = self.provider.get_identity(id).await? {
                tracing::debug!(identity_id = %id, "reusing stored identity");
                return Ok(identity);
            }
            tracing::warn!(identity_id = %id, "stored identity no longer exists");
        }

        let identity = self
            .provider
            .create_system_identity(IDENTITY_NAME, vec![GROUP_ID_ADMIN.to_string()])
            .await?;
        record.vault_user = Some(identity.id);
        let data = serde_json::to_value(&record).map_err(|err| VaultLinkError::Storage(Box::new(err)))?;
        self.store.save(STORAGE_KEY, STORAGE_VERSION, data).await?;

        tracing::info!(identity_id = %identity.id, "created system identity");
        Ok(identity)
    }

    /// Issue a new refresh token for `identity` and derive an access token from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to issue, sign or revoke tokens.
    #[tracing::instrument(skip(self, identity), fields(identity_id = %identity.id))]
    pub async fn issue_access_token(
        &self,
        identity: &SystemIdentity,
    ) -> Result<IssuedToken, VaultLinkError> {
        let refresh_token = self
            .provider
            .create_refresh_token(identity, TOKEN_CLIENT_NAME, time::access_token_lifetime())
            .await?;
        let access_token = self.provider.create_access_token(&refresh_token)?;

        if self.revoke_previous_tokens {
            self.revoke_other_tokens(identity.id, refresh_token.id).await?;
        }

        tracing::info!(refresh_token_id = %refresh_token.id, "issued access token");
        Ok(IssuedToken {
            refresh_token_id: refresh_token.id,
            access_token,
        })
    }

    /// [`ensure_identity`](Self::ensure_identity) followed by
    /// [`issue_access_token`](Self::issue_access_token).
    ///
    /// # Errors
    ///
    /// Propagates errors from either step.
    pub async fn ensure_access_token(
        &self,
    ) -> Result<(SystemIdentity, IssuedToken), VaultLinkError> {
        let identity = self.ensure_identity().await?;
        let issued = self.issue_access_token(&identity).await?;
        Ok((identity, issued))
    }

    async fn load_record(&self) -> Result<IdentityRecord, VaultLinkError> {
        match self.store.load(STORAGE_KEY).await? {
            Some(data) => {
                serde_json::from_value(data).map_err(|err| VaultLinkError::Storage(Box::new(err)))
            }
            None => Ok(IdentityRecord::default()),
        }
    }

    async fn revoke_other_tokens(
        &self,
        identity_id: IdentityId,
        keep: RefreshTokenId,
    ) -> Result<(), VaultLinkError> {
        for token in self.provider.list_refresh_tokens(identity_id).await? {
            if token.id != keep {
                self.provider.remove_refresh_token(token.id).await?;
                tracing::debug!(refresh_token_id = %token.id, "revoked refresh token");
            }
        }
        Ok(())
    }
}
