//! # vaultlink-domain
//!
//! Pure domain model for the vaultlink integration.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Config entries** (one configured installation and its connection settings)
//! - Define **System identities** and **refresh / access tokens** issued by the host
//! - Define **Devices** registered on behalf of an entry
//! - Define the typed **Vault session** (login response) and the published
//!   **connection info** payload
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;
pub mod token;

pub mod config_entry;
pub mod connection;
pub mod device;
pub mod identity;
pub mod session;
