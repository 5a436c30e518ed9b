//! Secrets provider implementations

mod cloudflare_api;
mod cloudflare_workers;

use std::sync::Arc;

pub use cloudflare_api::{
    CloudflareApiClient, WorkerSecretBindingType, WorkersPutSecretRequest,
    WorkersPutSecretResponse, WorkersSecretsClient,
};
pub use cloudflare_workers::{CloudflareWorkersSecrets, PROVIDER_NAME as CLOUDFLARE_WORKERS_SECRET};

use crate::{SecretsConfig, SecretsError, SecretsProvider};

/// Names accepted by [`from_name`]
pub fn available() -> &'static [&'static str] {
    &[CLOUDFLARE_WORKERS_SECRET]
}

/// Construct the provider registered under `name`
pub fn from_name(name: &str, config: &SecretsConfig) -> Result<Arc<dyn SecretsProvider>, SecretsError> {
    match name {
        CLOUDFLARE_WORKERS_SECRET => Ok(Arc::new(CloudflareWorkersSecrets::new(config)?)),
        other => Err(SecretsError::UnknownProvider(other.to_string())),
    }
}
