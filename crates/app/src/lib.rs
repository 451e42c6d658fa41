//! # vaultlink-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SecretsServer` — Vault login and connection-info publishing
//!   - `IdentityProvider` — host system identities, refresh and access tokens
//!   - `KeyValueStore` — small versioned JSON records
//!   - `DeviceRepository` / `ConfigEntryRepository` — host registries
//!   - `ExternalUrl` — how the instance is reachable from outside
//! - Define **driving/inbound ports** as use-case structs/traits:
//!   - `CredentialCoordinator` — authenticate, mint host token, publish, refresh
//!   - `VaultIntegration` — setup / background / teardown lifecycle per entry
//!   - `ConfigFlow` — collect connection settings and create entries
//!   - `EntryManager` — run one integration per stored entry
//! - Orchestrate domain objects without knowing *how* IO works
//!
//! ## Dependency rule
//! Depends on `vaultlink-domain` only (plus `tokio` for locks, tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
