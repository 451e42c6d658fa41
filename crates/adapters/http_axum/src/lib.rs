//! # vaultlink-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the configuration flow (`/api/config_flow`) used to add Vault entries
//! - Expose the stored entries and the device registry as JSON
//! - Hand newly created entries to the daemon so they are set up immediately
//!
//! Passwords never leave this adapter: every entry is redacted before it is
//! serialized.
//!
//! ## Dependency rule
//! Depends on `vaultlink-app` (for port traits and services) and `vaultlink-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
