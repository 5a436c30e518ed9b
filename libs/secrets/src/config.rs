//! Configuration for secrets providers

use std::time::Duration;

use secrecy::Secret;

const CLOUDFLARE_API_KEY: &str = "CLOUDFLARE_API_KEY";
const CLOUDFLARE_API_EMAIL: &str = "CLOUDFLARE_API_EMAIL";
const CLOUDFLARE_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
const CLOUDFLARE_API_URL: &str = "CLOUDFLARE_API_URL";
const SECRETS_REQUEST_TIMEOUT_SECS: &str = "SECRETS_REQUEST_TIMEOUT_SECS";

const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the secrets providers
#[derive(Debug, Clone)]
pub struct SecretsConfig {
    /// Cloudflare Workers Secrets configuration
    pub workers: WorkersSecretsConfig,
    /// Timeout applied to every outbound HTTP request
    pub request_timeout: Duration,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            workers: WorkersSecretsConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SecretsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var(SECRETS_REQUEST_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            workers: WorkersSecretsConfig::from_env(),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Credentials and endpoint for the Cloudflare Workers Secrets API
#[derive(Debug, Clone, Default)]
pub struct WorkersSecretsConfig {
    /// Global API key
    pub api_key: Option<Secret<String>>,
    /// Email of the account owning the API key
    pub api_email: Option<String>,
    /// Account the Worker scripts belong to
    pub account_id: Option<String>,
    /// API base URL, overridable for testing
    pub url: Option<String>,
}

impl WorkersSecretsConfig {
    /// Load Workers Secrets configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(CLOUDFLARE_API_KEY).map(Secret::new),
            api_email: non_empty_var(CLOUDFLARE_API_EMAIL),
            account_id: non_empty_var(CLOUDFLARE_ACCOUNT_ID),
            url: non_empty_var(CLOUDFLARE_API_URL),
        }
    }

    /// Check that every credential is present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_email.is_some() && self.account_id.is_some()
    }

    /// Get the API URL, defaulting to the public Cloudflare API
    pub fn api_url(&self) -> String {
        self.url
            .as_deref()
            .unwrap_or(DEFAULT_CLOUDFLARE_API_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
