//! Configuration flow — a single `user` step collecting the Vault
//! connection settings.
//!
//! Values are only checked for presence. Nothing is sent to Vault here, so a
//! wrong address or password surfaces at the first authentication.

use serde::{Deserialize, Serialize};

use vaultlink_domain::config_entry::{ConfigEntry, ConnectionConfig, DEFAULT_VAULT_ADDR};
use vaultlink_domain::error::{ValidationError, VaultLinkError};
use vaultlink_domain::token::token_hex;

use crate::ports::ConfigEntryRepository;

/// Number of random bytes in an entry's unique id.
const UNIQUE_ID_BYTES: usize = 6;

/// One field of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// The form shown for the `user` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowForm {
    pub step_id: &'static str,
    pub fields: Vec<FormField>,
}

/// Values submitted for the `user` step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowInput {
    pub addr: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl FlowInput {
    fn into_connection_config(self) -> Result<ConnectionConfig, ValidationError> {
        Ok(ConnectionConfig {
            address: self.addr.ok_or(ValidationError::MissingField("addr"))?,
            username: self.username.ok_or(ValidationError::MissingField("username"))?,
            password: self.password.ok_or(ValidationError::MissingField("password"))?,
            email: self.email.ok_or(ValidationError::MissingField("email"))?,
        })
    }
}

/// Creates config entries from user input.
pub struct ConfigFlow<R> {
    repo: R,
}

impl<R: ConfigEntryRepository> ConfigFlow<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The form for the `user` step.
    #[must_use]
    pub fn show_form(&self) -> FlowForm {
        FlowForm {
            step_id: "user",
            fields: vec![
                FormField {
                    name: "addr",
                    description: "Address of the Vault server",
                    required: true,
                    default: Some(DEFAULT_VAULT_ADDR),
                },
                FormField {
                    name: "username",
                    description: "Username",
                    required: true,
                    default: None,
                },
                FormField {
                    name: "password",
                    description: "Password",
                    required: true,
                    default: None,
                },
                FormField {
                    name: "email",
                    description: "E-mail",
                    required: true,
                    default: None,
                },
            ],
        }
    }

    /// Accept the submitted values and persist a new entry under a fresh
    /// random unique id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when a field is absent,
    /// [`VaultLinkError::AlreadyConfigured`] when the unique id is taken,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, input))]
    pub async fn submit(&self, input: FlowInput) -> Result<ConfigEntry, VaultLinkError> {
        let unique_id = token_hex(UNIQUE_ID_BYTES);
        if self.repo.find_by_unique_id(&unique_id).await?.is_some() {
            return Err(VaultLinkError::AlreadyConfigured(unique_id));
        }

        let data = input.into_connection_config()?;
        let entry = self.repo.create(ConfigEntry::new(unique_id, data)).await?;
        tracing::info!(entry_id = %entry.entry_id, unique_id = %entry.unique_id, "config entry created");
        Ok(entry)
    }

    /// All stored entries.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_entries(&self) -> Result<Vec<ConfigEntry>, VaultLinkError> {
        self.repo.get_all().await
    }
}
