//! Credential coordinator — keeps a Vault session and a host access token,
//! and tells Vault how to reach this instance.
//!
//! One coordinator exists per config entry. It owns the entry's connection
//! settings and its mutable state; nothing is shared through ambient lookups.
//!
//! State machine: `Unauthenticated ⇄ Authenticated`, driven solely by the
//! outcome of the latest login. A failed login never clears the previous
//! session, but publishing refuses to run while unauthenticated.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use vaultlink_domain::config_entry::ConfigEntry;
use vaultlink_domain::connection::ConnectionInfo;
use vaultlink_domain::error::{SyncError, VaultLinkError};
use vaultlink_domain::id::IdentityId;
use vaultlink_domain::identity::AccessToken;
use vaultlink_domain::session::VaultSession;
use vaultlink_domain::time::{self, Timestamp};

use crate::ports::{ExternalUrl, IdentityProvider, KeyValueStore, SecretsServer};
use crate::services::identity_service::IdentityService;

/// Default period between two scheduled re-authentications.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Snapshot of a coordinator's mutable state.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    /// Last successful login. Survives failed re-authentications.
    pub session: Option<VaultSession>,
    /// Whether the latest login succeeded.
    pub authenticated: bool,
    pub identity_id: Option<IdentityId>,
    /// Most recently issued host access token.
    pub access_token: Option<AccessToken>,
    pub last_refresh: Option<Timestamp>,
    pub last_publish: Option<Timestamp>,
}

/// Orchestrates login, host identity and publishing for one config entry.
pub struct CredentialCoordinator<S, I, K, N> {
    entry: ConfigEntry,
    secrets: S,
    identities: IdentityService<I, K>,
    network: N,
    state: RwLock<CoordinatorState>,
}

impl<S, I, K, N> CredentialCoordinator<S, I, K, N>
where
    S: SecretsServer,
    I: IdentityProvider,
    K: KeyValueStore,
    N: ExternalUrl,
{
    pub fn new(
        entry: ConfigEntry,
        secrets: S,
        identities: IdentityService<I, K>,
        network: N,
    ) -> Self {
        Self {
            entry,
            secrets,
            identities,
            network,
            state: RwLock::new(CoordinatorState::default()),
        }
    }

    #[must_use]
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// Copy of the current state.
    pub async fn state(&self) -> CoordinatorState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.authenticated
    }

    /// Log in to Vault and cache the session.
    ///
    /// On failure the entry becomes unauthenticated and the previously cached
    /// session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::SecretsServer`] with the transport, status
    /// or decode failure.
    #[tracing::instrument(skip(self), fields(entry_id = %self.entry.entry_id, username = %self.entry.data.username))]
    pub async fn authenticate(&self) -> Result<(), VaultLinkError> {
        match self.secrets.login(&self.entry.data).await {
            Ok(login) => {
                let session = VaultSession::new(login);
                let mut state = self.state.write().await;
                state.last_refresh = Some(session.obtained_at);
                state.session = Some(session);
                state.authenticated = true;
                tracing::info!("authenticated with Vault");
                Ok(())
            }
            Err(err) => {
                self.state.write().await.authenticated = false;
                if let Some(status) = err.status() {
                    tracing::error!(status, error = %err, "Vault rejected login");
                } else {
                    tracing::error!(error = ?err, "Vault login failed");
                }
                Err(err.into())
            }
        }
    }

    /// Obtain the host identity and issue a fresh access token for it.
    ///
    /// The new token replaces the current one even when the identity already
    /// existed.
    ///
    /// # Errors
    ///
    /// Propagates identity provider and storage errors.
    #[tracing::instrument(skip(self), fields(entry_id = %self.entry.entry_id))]
    pub async fn ensure_host_identity(&self) -> Result<AccessToken, VaultLinkError> {
        let (identity, issued) = self.identities.ensure_access_token().await?;
        let mut state = self.state.write().await;
        state.identity_id = Some(identity.id);
        state.access_token = Some(issued.access_token.clone());
        Ok(issued.access_token)
    }

    /// Push the external URL and current access token to Vault.
    ///
    /// No request is sent unless the entry is authenticated and a token
    /// has been issued. Never retried.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when a precondition is missing, or
    /// [`VaultLinkError::SecretsServer`] when the request fails.
    #[tracing::instrument(skip(self), fields(entry_id = %self.entry.entry_id, email = %self.entry.data.email))]
    pub async fn publish_connection_info(&self) -> Result<(), VaultLinkError> {
        let result = self.try_publish().await;
        match &result {
            Ok(()) => tracing::info!("connection info synchronised with Vault"),
            Err(VaultLinkError::Sync(SyncError::NoUrlAvailable)) => {
                tracing::error!("no external URL is available for this instance");
            }
            Err(err) => tracing::error!(error = ?err, "failed to synchronise connection info"),
        }
        result
    }

    async fn try_publish(&self) -> Result<(), VaultLinkError> {
        let (client_token, token) = {
            let state = self.state.read().await;
            if !state.authenticated {
                return Err(SyncError::NotAuthenticated.into());
            }
            let session = state.session.as_ref().ok_or(SyncError::NotAuthenticated)?;
            let token = state.access_token.clone().ok_or(SyncError::NoAccessToken)?;
            (session.client_token().to_string(), token)
        };

        let url = self.network.external_url()?;
        let info = ConnectionInfo { url, token };
        self.secrets
            .publish(&self.entry.data, &client_token, &info)
            .await?;

        self.state.write().await.last_publish = Some(time::now());
        Ok(())
    }

    /// One scheduled cycle: re-authenticate.
    ///
    /// # Errors
    ///
    /// Same as [`authenticate`](Self::authenticate).
    pub async fn refresh(&self) -> Result<(), VaultLinkError> {
        self.authenticate().await
    }
}

impl<S, I, K, N> CredentialCoordinator<S, I, K, N>
where
    S: SecretsServer + 'static,
    I: IdentityProvider + 'static,
    K: KeyValueStore + 'static,
    N: ExternalUrl + 'static,
{
    /// Spawn a task that calls [`refresh`](Self::refresh) every `period`.
    ///
    /// The first refresh happens one full period after the call. Failures
    /// are logged by `refresh` and the loop carries on.
    pub fn spawn_refresh_loop(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if coordinator.refresh().await.is_err() {
                    tracing::debug!(
                        entry_id = %coordinator.entry.entry_id,
                        "scheduled refresh failed, retrying next period"
                    );
                }
            }
        })
    }
}
