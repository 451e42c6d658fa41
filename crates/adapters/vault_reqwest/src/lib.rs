//! # vaultlink-adapter-vault-reqwest
//!
//! HTTP adapter for the Vault secrets server, built on
//! [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `SecretsServer` port defined in `vaultlink-app`
//! - `POST {addr}/v1/auth/userpass/login/{username}` with `{"password": …}`
//! - `POST {addr}/v1/smarthomes/data/{email}` with `{"data": {"url": …, "token": …}}`
//!   and the `X-Vault-Token` header
//! - Classify every failure as transport, status, or decode error
//!
//! ## Dependency rule
//! Depends on `vaultlink-app` (for the port trait) and `vaultlink-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

mod client;
mod config;
mod error;

pub use client::VaultHttpClient;
pub use config::VaultClientConfig;
pub use error::VaultClientError;
