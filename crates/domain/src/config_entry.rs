//! Config entry — one configured installation of the integration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EntryId;
use crate::time::{self, Timestamp};

/// Integration domain, used as device identifier namespace and storage key.
pub const DOMAIN: &str = "vault";

/// Default Vault address offered by the configuration form.
pub const DEFAULT_VAULT_ADDR: &str = "http://localhost:8200";

/// Current schema version of a [`ConfigEntry`].
pub const ENTRY_VERSION: u32 = 1;

const REDACTED: &str = "**REDACTED**";

/// Settings needed to reach the Vault server. Immutable once the entry exists.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base address of the Vault server (e.g. `https://vault.example.com`).
    #[serde(rename = "addr")]
    pub address: String,
    pub username: String,
    pub password: String,
    /// Identifier under which connection info is published.
    pub email: String,
}

impl ConnectionConfig {
    /// Address without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn base_address(&self) -> &str {
        self.address.trim_end_matches('/')
    }

    /// Copy with the password masked, for display and API responses.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("email", &self.email)
            .finish()
    }
}

/// A stored installation of the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: EntryId,
    /// Random opaque identifier keeping installations distinct.
    pub unique_id: String,
    pub title: String,
    pub version: u32,
    pub data: ConnectionConfig,
    pub created_at: Timestamp,
}

impl ConfigEntry {
    /// Create a fresh entry titled `"Vault"` for the given connection settings.
    #[must_use]
    pub fn new(unique_id: impl Into<String>, data: ConnectionConfig) -> Self {
        Self {
            entry_id: EntryId::new(),
            unique_id: unique_id.into(),
            title: "Vault".to_string(),
            version: ENTRY_VERSION,
            data,
            created_at: time::now(),
        }
    }

    /// Copy with the password masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            data: self.data.redacted(),
            ..self.clone()
        }
    }
}
