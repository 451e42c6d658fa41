//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`VaultLinkError`] via `#[from]` or a `From` impl.

/// Top-level error shared by every layer.
#[derive(Debug, thiserror::Error)]
pub enum VaultLinkError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("entry with unique id {0} is already configured")]
    AlreadyConfigured(String),

    #[error("secrets server error")]
    SecretsServer(#[from] SecretsServerError),

    #[error("sync error")]
    Sync(#[from] SyncError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("required field {0} is missing")]
    MissingField(&'static str),
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Outcome of a failed call to the secrets server.
///
/// Every secrets-server operation resolves to either a typed success value
/// or exactly one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum SecretsServerError {
    /// The request never produced an HTTP response (DNS, connect, timeout, …).
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered with a body we could not decode.
    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),
}

impl SecretsServerError {
    /// HTTP status of the response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Preconditions of publishing connection info that were not met.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("no authenticated Vault session")]
    NotAuthenticated,

    #[error("no access token issued yet")]
    NoAccessToken,

    #[error("no external URL is available for this instance")]
    NoUrlAvailable,
}
