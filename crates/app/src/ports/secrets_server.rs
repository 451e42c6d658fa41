//! Secrets server port — the Vault HTTP API used by the integration.

use std::future::Future;
use std::sync::Arc;

use vaultlink_domain::config_entry::ConnectionConfig;
use vaultlink_domain::connection::ConnectionInfo;
use vaultlink_domain::error::SecretsServerError;
use vaultlink_domain::session::LoginResponse;

/// Client for the secrets server.
///
/// Every call resolves to a typed success value or exactly one
/// [`SecretsServerError`] variant (transport, status, decode).
pub trait SecretsServer: Send + Sync {
    /// `POST {addr}/v1/auth/userpass/login/{username}` with the password.
    fn login(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<LoginResponse, SecretsServerError>> + Send;

    /// `POST {addr}/v1/smarthomes/data/{email}` authenticated with `client_token`.
    fn publish(
        &self,
        config: &ConnectionConfig,
        client_token: &str,
        info: &ConnectionInfo,
    ) -> impl Future<Output = Result<(), SecretsServerError>> + Send;
}

impl<T: SecretsServer> SecretsServer for Arc<T> {
    fn login(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<LoginResponse, SecretsServerError>> + Send {
        (**self).login(config)
    }

    fn publish(
        &self,
        config: &ConnectionConfig,
        client_token: &str,
        info: &ConnectionInfo,
    ) -> impl Future<Output = Result<(), SecretsServerError>> + Send {
        (**self).publish(config, client_token, info)
    }
}
