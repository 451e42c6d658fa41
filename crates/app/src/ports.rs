//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod identity;
pub mod integration;
pub mod key_value;
pub mod network;
pub mod secrets_server;
pub mod storage;

pub use identity::IdentityProvider;
pub use integration::{Integration, IntegrationContext};
pub use key_value::KeyValueStore;
pub use network::{ExternalUrl, StaticExternalUrl};
pub use secrets_server::SecretsServer;
pub use storage::{ConfigEntryRepository, DeviceRepository};
