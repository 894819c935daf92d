#![allow(dead_code)]

use std::time::Duration;

use kythera_kdx::{AuthenticatedClient, ClientConfig, ConfigOverrides};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/tenant/oauth2/v2.0/token";
pub const DEVICE_CODE_PATH: &str = "/tenant/oauth2/v2.0/devicecode";

/// Overrides pointing both the API and the authority at the mock server.
pub fn overrides(server: &MockServer) -> ConfigOverrides {
    ConfigOverrides::new()
        .base_url(server.uri())
        .authority_host(server.uri())
        .tenant_id("tenant")
        .client_id("test-client")
}

pub fn config(overrides: ConfigOverrides) -> ClientConfig {
    ClientConfig::resolve_with(overrides, |_| None).expect("config")
}

pub fn service_principal(server: &MockServer) -> AuthenticatedClient {
    let with_secret = overrides(server).client_secret("test-secret");
    AuthenticatedClient::new(config(with_secret)).expect("client")
}

pub fn service_principal_with_timeout(
    server: &MockServer,
    timeout: Duration,
) -> AuthenticatedClient {
    AuthenticatedClient::new(config(
        overrides(server).client_secret("test-secret").timeout(timeout),
    ))
    .expect("client")
}

pub fn token_body(access_token: &str) -> serde_json::Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "expires_in": 3600
    })
}

/// Token endpoint that always issues `access_token`.
pub async fn mount_token(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access_token)))
        .mount(server)
        .await;
}

/// Token endpoint that issues `access_token` once.
pub async fn mount_token_once(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access_token)))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

pub async fn count_requests(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}
