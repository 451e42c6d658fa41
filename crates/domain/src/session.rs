//! Vault login response and the session built from it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{self, Timestamp};

/// Body returned by `POST /v1/auth/userpass/login/{username}`.
///
/// Only `auth.client_token` is required; everything else defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
    pub auth: AuthInfo,
}

/// The `auth` block of a login response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub client_token: String,
    #[serde(default)]
    pub accessor: String,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub token_policies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub entity_id: String,
}

impl fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInfo")
            .field("client_token", &"[REDACTED]")
            .field("accessor", &self.accessor)
            .field("policies", &self.policies)
            .field("token_policies", &self.token_policies)
            .field("metadata", &self.metadata)
            .field("lease_duration", &self.lease_duration)
            .field("renewable", &self.renewable)
            .field("entity_id", &self.entity_id)
            .finish()
    }
}

// Vault sends `"metadata": null` for some auth methods.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An authenticated Vault session: the last successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSession {
    pub login: LoginResponse,
    pub obtained_at: Timestamp,
}

impl VaultSession {
    /// Wrap a login response obtained just now.
    #[must_use]
    pub fn new(login: LoginResponse) -> Self {
        Self {
            login,
            obtained_at: time::now(),
        }
    }

    /// Token to send as `X-Vault-Token`.
    #[must_use]
    pub fn client_token(&self) -> &str {
        &self.login.auth.client_token
    }
}
