//! Authenticated request dispatch for the Kythera API.
//!
//! Every call attaches a bearer token from the [`TokenManager`]. A 401 triggers
//! exactly one forced refresh and resend; nothing else is retried.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::query::Query;
use crate::auth::token_manager::{DeviceCodeHandler, TokenInfo, TokenManager};
use crate::config::{ClientConfig, ConfigOverrides};
use crate::error::{KdxError, Result};

const AUTH_RETRY_FAILED: &str = "authentication failed after token refresh";

/// HTTP client that authenticates every request.
pub struct AuthenticatedClient {
    config: ClientConfig,
    tokens: TokenManager,
    http_client: Client,
}

impl AuthenticatedClient {
    /// Create a client from resolved configuration. No network calls are made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| KdxError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let tokens = TokenManager::new(&config)?;

        Ok(Self {
            config,
            tokens,
            http_client,
        })
    }

    /// Resolve configuration from the environment and create a client.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::load(ConfigOverrides::default())?)
    }

    /// Replace the hook that shows device code sign-in instructions.
    pub fn with_device_code_handler(mut self, handler: DeviceCodeHandler) -> Self {
        self.tokens = self.tokens.with_device_code_handler(handler);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url(),
            path.trim().trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, query: Option<&Query>) -> Result<Response> {
        self.request(Method::GET, path, None, query).await
    }

    pub async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(encode_body).transpose()?;
        self.request(Method::POST, path, body, None).await
    }

    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(encode_body).transpose()?;
        self.request(Method::PUT, path, body, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// GET and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str, query: Option<&Query>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        decode(self.get(path, query).await?).await
    }

    /// POST and decode the JSON body.
    pub async fn post_json<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode(self.post(path, body).await?).await
    }

    /// True when a cached token is present and not within the expiry buffer.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub fn get_token_info(&self) -> TokenInfo {
        self.tokens.token_info()
    }

    pub fn clear_token_cache(&self) {
        self.tokens.clear_cache();
    }

    /// Release the connection pool. Dropping the client has the same effect.
    pub fn close(self) {
        debug!("Closing Kythera API client");
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        query: Option<&Query>,
    ) -> Result<Response> {
        let url = self.url(path);

        let token = self.authenticate(false).await?;
        debug!("{} {}", method, url);
        let mut response = self
            .send(method.clone(), &url, body.as_deref(), query, &token)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("{} {} returned 401, refreshing token and retrying once", method, url);
            let token = self.authenticate(true).await?;
            response = self
                .send(method.clone(), &url, body.as_deref(), query, &token)
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                let payload = error_payload(response).await;
                let message = match auth_failure_reason(&payload) {
                    Some(reason) => format!("{}: {}", AUTH_RETRY_FAILED, reason),
                    None => AUTH_RETRY_FAILED.to_string(),
                };
                return Err(KdxError::Authentication(message));
            }
        }

        let status = response.status();
        if !status.is_success() {
            let payload = error_payload(response).await;
            warn!("{} {} failed: HTTP {}", method, url, status);
            return Err(KdxError::api_status(status.as_u16(), payload));
        }

        Ok(response)
    }

    async fn authenticate(&self, force_refresh: bool) -> Result<String> {
        self.tokens
            .get_token(force_refresh)
            .await
            .map_err(|e| match e {
                KdxError::Authentication(_) => e,
                other => KdxError::Authentication(format!("Failed to authenticate: {}", other)),
            })
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&[u8]>,
        query: Option<&Query>,
        token: &str,
    ) -> Result<Response> {
        let mut request = self.http_client.request(method, url).bearer_auth(token);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            request = request.query(query.pairs());
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        request.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, error: reqwest::Error) -> KdxError {
        if error.is_timeout() {
            KdxError::Timeout(self.config.timeout())
        } else if error.is_connect() {
            KdxError::Connection(format!("Failed to connect to Kythera API: {}", error))
        } else {
            KdxError::Api {
                message: format!("Request failed: {}", error),
                status: None,
                payload: Value::Null,
            }
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| KdxError::Api {
        message: format!("Failed to serialize request body: {}", e),
        status: None,
        payload: Value::Null,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| KdxError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| KdxError::Decode(e.to_string()))
}

/// Parsed error body; an absent or non-JSON body becomes `{}`.
async fn error_payload(response: Response) -> Value {
    let bytes = response.bytes().await.unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Machine-readable reason from a 401 body, if the API sent one.
fn auth_failure_reason(payload: &Value) -> Option<String> {
    let error = payload.get("error");
    error
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("code")).and_then(Value::as_str))
        .or_else(|| payload.get("code").and_then(Value::as_str))
        .map(str::to_string)
}
