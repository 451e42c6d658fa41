//! Device — a logical device registered on behalf of a config entry.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, VaultLinkError};
use crate::id::{DeviceId, EntryId};

/// A device in the host registry.
///
/// Identified across restarts by the `(integration, unique_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Integration that registered this device (e.g. `"vault"`).
    pub integration: String,
    /// Identifier unique within `integration`.
    pub unique_id: String,
    pub config_entry_id: Option<EntryId>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub sw_version: Option<String>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::Validation`] when `name`, `integration`
    /// or `unique_id` is empty.
    pub fn validate(&self) -> Result<(), VaultLinkError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.integration.is_empty() {
            return Err(ValidationError::MissingField("integration").into());
        }
        if self.unique_id.is_empty() {
            return Err(ValidationError::MissingField("unique_id").into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    integration: Option<String>,
    unique_id: Option<String>,
    config_entry_id: Option<EntryId>,
    model: Option<String>,
    manufacturer: Option<String>,
    sw_version: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn integration(mut self, integration: impl Into<String>) -> Self {
        self.integration = Some(integration.into());
        self
    }

    #[must_use]
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    #[must_use]
    pub fn config_entry_id(mut self, entry_id: EntryId) -> Self {
        self.config_entry_id = Some(entry_id);
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn sw_version(mut self, sw_version: impl Into<String>) -> Self {
        self.sw_version = Some(sw_version.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`VaultLinkError::Validation`] if a required field is missing or empty.
    pub fn build(self) -> Result<Device, VaultLinkError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            integration: self.integration.unwrap_or_default(),
            unique_id: self.unique_id.unwrap_or_default(),
            config_entry_id: self.config_entry_id,
            model: self.model,
            manufacturer: self.manufacturer,
            sw_version: self.sw_version,
        };
        device.validate()?;
        Ok(device)
    }
}
