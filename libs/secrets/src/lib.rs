//! # Secrets Provider Library
//!
//! A uniform contract over heterogeneous secret backends, plus a write-only
//! provider for Cloudflare Workers Secrets.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  caller: KeyPath + providers::from_name("...")              │
//! │                          │                                   │
//! │                          ▼                                   │
//! │  SecretsProvider  put / put_mapping / get / get_mapping /    │
//! │                   delete / delete_mapping / capability       │
//! │                          │                                   │
//! │                          ▼                                   │
//! │  CloudflareWorkersSecrets ──► WorkersSecretsClient (HTTP)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Providers that cannot serve an operation say so with
//! [`SecretsError::Unsupported`] or [`SecretsError::NotImplemented`]; nothing
//! is ever skipped silently.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use secrets::{providers, KeyPath, SecretsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), secrets::SecretsError> {
//!     let config = SecretsConfig::from_env();
//!     let provider = providers::from_name("cloudflare_workers_secret", &config)?;
//!
//!     let path = KeyPath::new("api/prod").with_source("my-worker").with_env("API_KEY");
//!     provider.put(&path, "s3cr3t").await?;
//!     provider.delete(&path).await
//! }
//! ```

mod config;
mod entities;
mod error;
mod provider;

pub mod providers;

pub use config::{SecretsConfig, WorkersSecretsConfig};
pub use entities::{join_path, EnvEntry, KeyPath};
pub use error::{ApiMessage, SecretsError};
pub use provider::{Capability, Operation, SecretsProvider};
