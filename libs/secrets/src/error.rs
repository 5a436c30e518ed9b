//! Error types for the secrets library

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::provider::Operation;

/// Errors that can occur when working with secrets
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The key path has no `source`, but the backend partitions secrets by resource
    #[error("`source` field is missing")]
    SourceMissing,

    /// Neither `field` nor `env` resolved to a secret name
    #[error("key required for fetching secrets. Received \"\"")]
    KeyRequired,

    /// The backend cannot offer this operation at all
    #[error("provider {provider} does not support {}", .operation.feature())]
    Unsupported {
        provider: &'static str,
        operation: Operation,
    },

    /// The backend could offer this operation but the provider does not yet
    #[error("provider {provider} does not implement {operation} yet")]
    NotImplemented {
        provider: &'static str,
        operation: Operation,
    },

    /// No provider is registered under this name
    #[error("Unknown secrets provider: {0}")]
    UnknownProvider(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to reach the backend
    #[error("Failed to connect to secrets provider: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The backend rejected the request; its own errors are kept as sent
    #[error("Backend request failed (HTTP {status}): {}", join_messages(.errors))]
    Backend { status: u16, errors: Vec<ApiMessage> },
}

impl SecretsError {
    pub fn unsupported(provider: &'static str, operation: Operation) -> Self {
        Self::Unsupported {
            provider,
            operation,
        }
    }

    pub fn not_implemented(provider: &'static str, operation: Operation) -> Self {
        Self::NotImplemented {
            provider,
            operation,
        }
    }

    /// Local key path checks that fail before any backend call
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::SourceMissing | Self::KeyRequired)
    }

    /// The provider refused the operation outright. Retrying cannot help;
    /// the caller wired the wrong provider for the job.
    pub fn is_capability_error(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::NotImplemented { .. })
    }
}

/// A single `{code, message}` entry as reported by the backend API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

fn join_messages(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
