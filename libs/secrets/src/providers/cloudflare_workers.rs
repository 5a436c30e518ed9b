//! Cloudflare Workers Secrets provider
//!
//! Write-only: secrets are scoped to a Worker script (`KeyPath::source`) and
//! can be set or deleted, never read back.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info};

use super::cloudflare_api::{CloudflareApiClient, WorkersPutSecretRequest, WorkersSecretsClient};
use crate::entities::join_path;
use crate::{Capability, EnvEntry, KeyPath, Operation, SecretsConfig, SecretsError, SecretsProvider};

pub const PROVIDER_NAME: &str = "cloudflare_workers_secret";

/// Provider backed by the Workers Secrets API of one Cloudflare account
pub struct CloudflareWorkersSecrets<C = CloudflareApiClient> {
    client: C,
}

impl CloudflareWorkersSecrets<CloudflareApiClient> {
    /// Create the provider with an authenticated Cloudflare API client
    pub fn new(config: &SecretsConfig) -> Result<Self, SecretsError> {
        let client = CloudflareApiClient::new(config)?;
        info!(provider = PROVIDER_NAME, "Workers secrets provider initialized");
        Ok(Self::with_client(client))
    }
}

impl<C: WorkersSecretsClient> CloudflareWorkersSecrets<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    fn secret_name(path: &KeyPath) -> Result<&str, SecretsError> {
        path.resolved_key().ok_or(SecretsError::KeyRequired)
    }

    fn require_source(path: &KeyPath) -> Result<(), SecretsError> {
        if path.source.is_empty() {
            return Err(SecretsError::SourceMissing);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: WorkersSecretsClient> SecretsProvider for CloudflareWorkersSecrets<C> {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn capability(&self, operation: Operation) -> Capability {
        match operation {
            Operation::Put | Operation::PutMapping | Operation::Delete => Capability::Supported,
            Operation::Get | Operation::GetMapping => Capability::Unsupported,
            Operation::DeleteMapping => Capability::NotImplemented,
        }
    }

    async fn put(&self, path: &KeyPath, value: &str) -> Result<(), SecretsError> {
        Self::require_source(path)?;
        let secret_name = Self::secret_name(path)?;

        let request = WorkersPutSecretRequest::text(secret_name, value);

        debug!(provider = PROVIDER_NAME, source = %path.source, key = %secret_name, "Putting secret");
        self.client
            .set_workers_secret(&path.source, &request)
            .await
            .map(|_| ())
    }

    async fn put_mapping(
        &self,
        path: &KeyPath,
        mapping: &HashMap<String, String>,
    ) -> Result<(), SecretsError> {
        Self::require_source(path)?;

        // Sequential and fail-fast. Keys written before a failure are left in place.
        for (key, value) in mapping {
            let entry_path = path.with_env(join_path(&path.path, key));
            self.put(&entry_path, value).await?;
        }
        Ok(())
    }

    async fn get(&self, _path: &KeyPath) -> Result<EnvEntry, SecretsError> {
        Err(SecretsError::unsupported(self.name(), Operation::Get))
    }

    async fn get_mapping(&self, _path: &KeyPath) -> Result<Vec<EnvEntry>, SecretsError> {
        Err(SecretsError::unsupported(self.name(), Operation::GetMapping))
    }

    async fn delete(&self, path: &KeyPath) -> Result<(), SecretsError> {
        Self::require_source(path)?;
        let secret_name = Self::secret_name(path)?;

        debug!(provider = PROVIDER_NAME, source = %path.source, key = %secret_name, "Deleting secret");
        self.client
            .delete_workers_secret(&path.source, secret_name)
            .await
    }

    async fn delete_mapping(&self, _path: &KeyPath) -> Result<(), SecretsError> {
        Err(SecretsError::not_implemented(
            self.name(),
            Operation::DeleteMapping,
        ))
    }
}
