//! HTTP level tests for the Cloudflare Workers Secrets client
//!
//! A wiremock server stands in for the Cloudflare API.

use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use secrets::providers::{CloudflareApiClient, WorkersPutSecretRequest, WorkersSecretsClient};
use secrets::{providers, KeyPath, SecretsConfig, SecretsError, WorkersSecretsConfig};

const SECRETS_PATH: &str = "/client/v4/accounts/acc-123/workers/scripts/svc/secrets";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config_for(server: &MockServer) -> SecretsConfig {
    SecretsConfig {
        workers: WorkersSecretsConfig {
            api_key: Some(Secret::new("test-api-key".to_string())),
            api_email: Some("ops@example.com".to_string()),
            account_id: Some("acc-123".to_string()),
            url: Some(format!("{}/client/v4", server.uri())),
        },
        ..Default::default()
    }
}

fn ok_envelope(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result
    }))
}

#[tokio::test]
async fn test_set_secret_puts_json_with_auth_headers() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SECRETS_PATH))
        .and(header("X-Auth-Key", "test-api-key"))
        .and(header("X-Auth-Email", "ops@example.com"))
        .and(body_json(json!({"name": "API_KEY", "text": "v1", "type": "secret_text"})))
        .respond_with(ok_envelope(json!({"name": "API_KEY", "type": "secret_text"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudflareApiClient::new(&config_for(&server)).unwrap();
    let response = client
        .set_workers_secret("svc", &WorkersPutSecretRequest::text("API_KEY", "v1"))
        .await
        .unwrap();

    assert_eq!(response.name, "API_KEY");
    assert_eq!(response.binding_type, "secret_text");
}

#[tokio::test]
async fn test_set_secret_surfaces_api_errors() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SECRETS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10007, "message": "workers.api.error.script_not_found"}],
            "messages": [],
            "result": null
        })))
        .mount(&server)
        .await;

    let client = CloudflareApiClient::new(&config_for(&server)).unwrap();
    let err = client
        .set_workers_secret("svc", &WorkersPutSecretRequest::text("API_KEY", "v1"))
        .await
        .unwrap_err();

    match err {
        SecretsError::Backend { status, errors } => {
            assert_eq!(status, 404);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code, 10007);
            assert_eq!(errors[0].message, "workers.api.error.script_not_found");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsuccessful_envelope_with_ok_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SECRETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}],
            "result": null
        })))
        .mount(&server)
        .await;

    let client = CloudflareApiClient::new(&config_for(&server)).unwrap();
    let err = client
        .set_workers_secret("svc", &WorkersPutSecretRequest::text("API_KEY", "v1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SecretsError::Backend { status: 200, .. }));
}

#[tokio::test]
async fn test_non_json_error_body_kept_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{SECRETS_PATH}/API_KEY")))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = CloudflareApiClient::new(&config_for(&server)).unwrap();
    let err = client
        .delete_workers_secret("svc", "API_KEY")
        .await
        .unwrap_err();

    match err {
        SecretsError::Backend { status, errors } => {
            assert_eq!(status, 502);
            assert_eq!(errors[0].message, "bad gateway");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_secret_encodes_name() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{SECRETS_PATH}/cfg%2Fa")))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudflareApiClient::new(&config_for(&server)).unwrap();
    client.delete_workers_secret("svc", "cfg/a").await.unwrap();
}

#[tokio::test]
async fn test_provider_end_to_end_over_http() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(SECRETS_PATH))
        .and(body_json(json!({"name": "cfg/a", "text": "1", "type": "secret_text"})))
        .respond_with(ok_envelope(json!({"name": "cfg/a", "type": "secret_text"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("{SECRETS_PATH}/cfg%2Fa")))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = providers::from_name("cloudflare_workers_secret", &config_for(&server)).unwrap();
    let base = KeyPath::new("cfg").with_source("svc");

    let mapping = std::collections::HashMap::from([("a".to_string(), "1".to_string())]);
    provider.put_mapping(&base, &mapping).await.unwrap();
    provider.delete(&base.with_env("cfg/a")).await.unwrap();

    // Reads are refused locally; the mocks above would fail `expect` on extra calls.
    assert!(provider.get(&base.with_env("cfg/a")).await.is_err());
}

#[tokio::test]
async fn test_unreachable_api_is_a_connection_failure() {
    // Bind then drop a listener so the port is known to be closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let config = SecretsConfig {
        workers: WorkersSecretsConfig {
            api_key: Some(Secret::new("test-api-key".to_string())),
            api_email: Some("ops@example.com".to_string()),
            account_id: Some("acc-123".to_string()),
            url: Some(format!("http://127.0.0.1:{port}/client/v4")),
        },
        ..Default::default()
    };

    let client = CloudflareApiClient::new(&config).unwrap();
    let err = client
        .set_workers_secret("svc", &WorkersPutSecretRequest::text("API_KEY", "v1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SecretsError::ConnectionFailed(_)));
    assert!(!err.is_capability_error());
}
