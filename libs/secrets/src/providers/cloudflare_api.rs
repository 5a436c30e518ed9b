//! Cloudflare Workers Secrets API client
//!
//! Only the two calls the Workers Secrets API offers per script are wrapped:
//! set a secret and delete a secret. There is no endpoint to read a value back.
//! See: https://developers.cloudflare.com/api/resources/workers/subresources/scripts/subresources/secrets/

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::{ApiMessage, SecretsConfig, SecretsError};

/// Binding type a Worker sees the secret as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkerSecretBindingType {
    #[serde(rename = "secret_text")]
    SecretText,
}

impl fmt::Display for WorkerSecretBindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerSecretBindingType::SecretText => f.write_str("secret_text"),
        }
    }
}

/// Body of a set-secret call
#[derive(Debug, Clone, Serialize)]
pub struct WorkersPutSecretRequest {
    pub name: String,
    #[serde(serialize_with = "expose")]
    pub text: Secret<String>,
    #[serde(rename = "type")]
    pub binding_type: WorkerSecretBindingType,
}

impl WorkersPutSecretRequest {
    /// Plain text secret binding
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Secret::new(value.into()),
            binding_type: WorkerSecretBindingType::SecretText,
        }
    }
}

fn expose<S: Serializer>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// What the API reports back after storing a secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkersPutSecretResponse {
    pub name: String,
    #[serde(rename = "type", default)]
    pub binding_type: String,
}

/// Remote operations the Workers Secrets adapter depends on
#[async_trait]
pub trait WorkersSecretsClient: Send + Sync {
    /// Create or overwrite a secret on the given Worker script
    async fn set_workers_secret(
        &self,
        script: &str,
        request: &WorkersPutSecretRequest,
    ) -> Result<WorkersPutSecretResponse, SecretsError>;

    /// Remove a secret from the given Worker script
    async fn delete_workers_secret(&self, script: &str, secret_name: &str)
        -> Result<(), SecretsError>;
}

/// Standard Cloudflare v4 response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

/// Cloudflare API client authenticated with a global API key
pub struct CloudflareApiClient {
    client: Client,
    api_url: String,
    account_id: String,
    api_key: Secret<String>,
    api_email: String,
}

impl CloudflareApiClient {
    /// Build a client from explicit configuration.
    ///
    /// Fails when any credential is missing, so bad wiring shows up at
    /// startup rather than on the first call.
    pub fn new(config: &SecretsConfig) -> Result<Self, SecretsError> {
        let workers = &config.workers;

        let api_key = workers
            .api_key
            .clone()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or_else(|| {
                SecretsError::InvalidConfig(
                    "invalid credentials: key & email must not be empty".to_string(),
                )
            })?;
        let api_email = workers
            .api_email
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                SecretsError::InvalidConfig(
                    "invalid credentials: key & email must not be empty".to_string(),
                )
            })?;
        let account_id = workers
            .account_id
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| SecretsError::InvalidConfig("Missing account_id".to_string()))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SecretsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_url: workers.api_url(),
            account_id,
            api_key,
            api_email,
        })
    }

    fn secrets_url(&self, script: &str) -> String {
        format!(
            "{}/accounts/{}/workers/scripts/{}/secrets",
            self.api_url,
            urlencoding::encode(&self.account_id),
            urlencoding::encode(script)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Auth-Key", self.api_key.expose_secret())
            .header("X-Auth-Email", &self.api_email)
    }

    /// Send a request and unwrap the response envelope.
    ///
    /// Any non-2xx status or `success: false` becomes [`SecretsError::Backend`]
    /// carrying the API's own error list.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, SecretsError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| SecretsError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope.result),
            Ok(envelope) => Err(SecretsError::Backend {
                status: status.as_u16(),
                errors: envelope.errors,
            }),
            Err(_) if !status.is_success() => Err(SecretsError::Backend {
                status: status.as_u16(),
                errors: vec![ApiMessage {
                    code: 0,
                    message: body,
                }],
            }),
            Err(e) => Err(SecretsError::ParseError(e)),
        }
    }
}

#[async_trait]
impl WorkersSecretsClient for CloudflareApiClient {
    async fn set_workers_secret(
        &self,
        script: &str,
        request: &WorkersPutSecretRequest,
    ) -> Result<WorkersPutSecretResponse, SecretsError> {
        debug!(script = %script, secret = %request.name, "Setting Workers secret");

        let result = self
            .send::<WorkersPutSecretResponse>(self.client.put(self.secrets_url(script)).json(request))
            .await?;

        Ok(result.unwrap_or_else(|| WorkersPutSecretResponse {
            name: request.name.clone(),
            binding_type: request.binding_type.to_string(),
        }))
    }

    async fn delete_workers_secret(
        &self,
        script: &str,
        secret_name: &str,
    ) -> Result<(), SecretsError> {
        debug!(script = %script, secret = %secret_name, "Deleting Workers secret");

        let url = format!(
            "{}/{}",
            self.secrets_url(script),
            urlencoding::encode(secret_name)
        );
        self.send::<serde_json::Value>(self.client.delete(url))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkersSecretsConfig;

    fn config() -> SecretsConfig {
        SecretsConfig {
            workers: WorkersSecretsConfig {
                api_key: Some(Secret::new("key".to_string())),
                api_email: Some("ops@example.com".to_string()),
                account_id: Some("acc 1".to_string()),
                url: Some("http://localhost:9000/client/v4/".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_request_serializes_plain_text_binding() {
        let request = WorkersPutSecretRequest::text("API_KEY", "v1");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"name": "API_KEY", "text": "v1", "type": "secret_text"})
        );
    }

    #[test]
    fn test_request_debug_redacts_value() {
        let request = WorkersPutSecretRequest::text("API_KEY", "do-not-print");
        assert!(!format!("{request:?}").contains("do-not-print"));
    }

    #[test]
    fn test_secrets_url_encodes_segments() {
        let client = CloudflareApiClient::new(&config()).unwrap();
        assert_eq!(
            client.secrets_url("my worker"),
            "http://localhost:9000/client/v4/accounts/acc%201/workers/scripts/my%20worker/secrets"
        );
    }

    #[test]
    fn test_missing_credentials_fail_construction() {
        let mut cfg = config();
        cfg.workers.api_email = None;
        assert!(matches!(
            CloudflareApiClient::new(&cfg),
            Err(SecretsError::InvalidConfig(_))
        ));

        let mut cfg = config();
        cfg.workers.api_key = Some(Secret::new(String::new()));
        assert!(matches!(
            CloudflareApiClient::new(&cfg),
            Err(SecretsError::InvalidConfig(_))
        ));

        let mut cfg = config();
        cfg.workers.account_id = None;
        assert!(matches!(
            CloudflareApiClient::new(&cfg),
            Err(SecretsError::InvalidConfig(_))
        ));
    }
}
