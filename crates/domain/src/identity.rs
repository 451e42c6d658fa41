//! System identities and the tokens issued for them by the host.

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::id::{IdentityId, RefreshTokenId};
use crate::time::{self, Timestamp};

/// Group granting administrative privileges on the host.
pub const GROUP_ID_ADMIN: &str = "system-admin";

/// Display name of the identity created for the integration.
pub const IDENTITY_NAME: &str = "Vault";

/// Client name attached to refresh tokens issued for the integration.
pub const TOKEN_CLIENT_NAME: &str = "vault";

/// A host-managed account that represents the integration's automated actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub id: IdentityId,
    pub name: String,
    pub group_ids: Vec<String>,
    pub system_generated: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl SystemIdentity {
    /// A new, active, system-generated identity.
    #[must_use]
    pub fn new(name: impl Into<String>, group_ids: Vec<String>) -> Self {
        Self {
            id: IdentityId::new(),
            name: name.into(),
            group_ids,
            system_generated: true,
            is_active: true,
            created_at: time::now(),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.group_ids.iter().any(|g| g == GROUP_ID_ADMIN)
    }
}

/// Long-lived token from which access tokens are derived.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub identity_id: IdentityId,
    pub client_name: String,
    /// Lifetime of every access token derived from this refresh token.
    pub access_token_expiration: TimeDelta,
    /// Secret used to sign derived access tokens.
    pub jwt_key: String,
    pub created_at: Timestamp,
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("id", &self.id)
            .field("identity_id", &self.identity_id)
            .field("client_name", &self.client_name)
            .field("access_token_expiration", &self.access_token_expiration)
            .field("jwt_key", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Bearer token for the home-automation instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Persisted reference to the integration's identity.
///
/// Stored as `{"vault_user": "<identity-id>"}`. Unknown keys are kept so a
/// save never drops data written by someone else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_user: Option<IdentityId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_active_system_identity() {
        let identity = SystemIdentity::new(IDENTITY_NAME, vec![GROUP_ID_ADMIN.to_string()]);
        assert!(identity.system_generated);
        assert!(identity.is_active);
        assert!(identity.is_admin());
    }

    #[test]
    fn should_not_leak_access_token_in_debug_output() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.secret");
        assert_eq!(format!("{token:?}"), "AccessToken([REDACTED])");
    }

    #[test]
    fn should_serialize_access_token_as_plain_string() {
        let token = AccessToken::new("abc");
        assert_eq!(serde_json::to_value(&token).unwrap(), "abc");
    }

    #[test]
    fn should_read_vault_user_and_keep_extra_keys() {
        let id = IdentityId::new();
        let json = serde_json::json!({ "vault_user": id.to_string(), "other": 1 });
        let record: IdentityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.vault_user, Some(id));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["other"], 1);
        assert_eq!(back["vault_user"], id.to_string());
    }

    #[test]
    fn should_read_empty_record() {
        let record: IdentityRecord = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(record.vault_user.is_none());
    }
}
