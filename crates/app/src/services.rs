//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod config_flow;
pub mod credential_coordinator;
pub mod device_service;
pub mod entry_manager;
pub mod identity_service;
pub mod integration_context;
pub mod vault_integration;
