//! Trait definition for secrets providers

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::{EnvEntry, KeyPath, SecretsError};

/// Operations of the provider contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    PutMapping,
    Get,
    GetMapping,
    Delete,
    DeleteMapping,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Put,
        Operation::PutMapping,
        Operation::Get,
        Operation::GetMapping,
        Operation::Delete,
        Operation::DeleteMapping,
    ];

    /// The broader functionality an operation belongs to
    pub fn feature(&self) -> &'static str {
        match self {
            Operation::Put | Operation::PutMapping => "write functionality",
            Operation::Get | Operation::GetMapping => "read functionality",
            Operation::Delete | Operation::DeleteMapping => "delete functionality",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Put => "put",
            Operation::PutMapping => "putMapping",
            Operation::Get => "get",
            Operation::GetMapping => "getMapping",
            Operation::Delete => "delete",
            Operation::DeleteMapping => "deleteMapping",
        };
        f.write_str(name)
    }
}

/// Whether a provider offers an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    /// The backend has no way to do this, ever
    Unsupported,
    /// The backend could, the provider does not yet
    NotImplemented,
}

impl Capability {
    /// Turn a refusal into the matching contract error
    pub fn ensure(self, provider: &'static str, operation: Operation) -> Result<(), SecretsError> {
        match self {
            Capability::Supported => Ok(()),
            Capability::Unsupported => Err(SecretsError::unsupported(provider, operation)),
            Capability::NotImplemented => Err(SecretsError::not_implemented(provider, operation)),
        }
    }
}

/// Trait for secrets providers
///
/// Every backend implements the whole contract. Operations a backend cannot
/// serve must fail with [`SecretsError::Unsupported`] or
/// [`SecretsError::NotImplemented`] and report the same answer from
/// [`SecretsProvider::capability`], never succeed silently.
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// Stable provider name, used for selection and in error messages
    fn name(&self) -> &'static str;

    /// Which operations this provider actually serves
    fn capability(&self, _operation: Operation) -> Capability {
        Capability::Supported
    }

    /// Create or overwrite one secret
    async fn put(&self, path: &KeyPath, value: &str) -> Result<(), SecretsError>;

    /// Create or overwrite every entry of `mapping` under `path.path`.
    ///
    /// Not atomic: on error, entries written before the failing one stay written.
    async fn put_mapping(
        &self,
        path: &KeyPath,
        mapping: &HashMap<String, String>,
    ) -> Result<(), SecretsError>;

    /// Read one secret
    async fn get(&self, path: &KeyPath) -> Result<EnvEntry, SecretsError>;

    /// Read every secret under `path.path`
    async fn get_mapping(&self, path: &KeyPath) -> Result<Vec<EnvEntry>, SecretsError>;

    /// Remove one secret
    async fn delete(&self, path: &KeyPath) -> Result<(), SecretsError>;

    /// Remove every secret under `path.path`
    async fn delete_mapping(&self, path: &KeyPath) -> Result<(), SecretsError>;
}
