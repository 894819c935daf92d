//! OAuth2 client for the Azure AD token and device authorization endpoints.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::config::ClientConfig;
use crate::error::{KdxError, Result};

/// HTTP request timeout for identity provider calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
const GRANT_REFRESH_TOKEN: &str = "refresh_token";
const GRANT_DEVICE_CODE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Poll interval used when the provider does not send one.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Bounds applied to the provider's poll interval.
const MIN_POLL_INTERVAL_SECS: u64 = 1;
const MAX_POLL_INTERVAL_SECS: u64 = 60;
/// Extra delay requested by a `slow_down` reply.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);
/// Device code lifetime used when the provider omits it or sends an unusable one.
const DEFAULT_DEVICE_CODE_LIFETIME_SECS: u64 = 900;
const MAX_DEVICE_CODE_LIFETIME_SECS: u64 = 24 * 60 * 60;
/// Longest token lifetime taken at face value. Longer values are treated as garbage.
const MAX_TOKEN_LIFETIME_SECS: f64 = 7.0 * 24.0 * 60.0 * 60.0;

/// Token response from the identity provider.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until expiry. Kept loose: providers send numbers or numeric strings.
    #[serde(default)]
    pub expires_in: Option<Value>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Reported lifetime, or `default` when missing, not numeric or out of range.
    pub fn lifetime_or(&self, default: chrono::Duration) -> chrono::Duration {
        let seconds = match &self.expires_in {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match seconds {
            Some(s) if s.is_finite() && (0.0..=MAX_TOKEN_LIFETIME_SECS).contains(&s) => {
                chrono::Duration::milliseconds((s * 1000.0) as i64)
            }
            _ => default,
        }
    }
}

/// Error body returned by the token endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OAuthErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthErrorResponse {
    /// Human-readable reason: description, then error code, then a placeholder.
    pub fn reason(&self) -> &str {
        self.error_description
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("Unknown error")
    }

    fn code(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

/// Raw device authorization response.
#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    user_code: Option<String>,
    device_code: Option<String>,
    #[serde(alias = "verification_url")]
    verification_uri: Option<String>,
    expires_in: Option<u64>,
    interval: Option<u64>,
    message: Option<String>,
}

/// A started device authorization, ready to be shown to the user and polled.
#[derive(Clone)]
pub struct DeviceAuthorization {
    pub user_code: String,
    device_code: Zeroizing<String>,
    pub verification_uri: String,
    pub expires_in: Duration,
    pub interval: Duration,
    pub message: String,
}

impl std::fmt::Debug for DeviceAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAuthorization")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("expires_in", &self.expires_in)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Outcome of a single token endpoint call.
enum TokenReply {
    Issued(TokenResponse),
    Rejected(OAuthErrorResponse),
}

/// OAuth2 client for the configured authority.
pub struct IdentityClient {
    client_id: String,
    client_secret: Option<Zeroizing<String>>,
    scopes: Vec<String>,
    token_url: String,
    device_code_url: String,
    http_client: reqwest::Client,
}

impl IdentityClient {
    /// Create a new identity client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| KdxError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().map(|s| Zeroizing::new(s.to_string())),
            scopes: config.scopes().to_vec(),
            token_url: config.token_url(),
            device_code_url: config.device_code_url(),
            http_client,
        })
    }

    fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Client credentials grant (confidential client).
    pub async fn acquire_for_client(&self) -> Result<TokenResponse> {
        let secret = self.client_secret.as_ref().ok_or_else(|| {
            KdxError::Authentication("Client credentials flow requires a client secret".into())
        })?;
        let scope = self.scope();

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", secret.as_str()),
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("scope", scope.as_str()),
        ];

        match self.post_token_form(&params).await? {
            TokenReply::Issued(token) => validate(token),
            TokenReply::Rejected(err) => Err(KdxError::Authentication(format!(
                "Failed to acquire token: {}",
                err.reason()
            ))),
        }
    }

    /// Refresh token grant, used for silent acquisition from a remembered account.
    pub async fn acquire_by_refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let scope = self.scope_with_offline_access();

        let params = [
            ("client_id", self.client_id.as_str()),
            ("grant_type", GRANT_REFRESH_TOKEN),
            ("refresh_token", refresh_token),
            ("scope", scope.as_str()),
        ];

        match self.post_token_form(&params).await? {
            TokenReply::Issued(token) => validate(token),
            TokenReply::Rejected(err) => Err(KdxError::Authentication(format!(
                "Silent token acquisition failed: {}",
                err.reason()
            ))),
        }
    }

    /// Start a device authorization (RFC 8628).
    pub async fn initiate_device_flow(&self) -> Result<DeviceAuthorization> {
        let scope = self.scope_with_offline_access();
        let params = [("client_id", self.client_id.as_str()), ("scope", scope.as_str())];

        let response = self
            .http_client
            .post(&self.device_code_url)
            .header("client-request-id", Uuid::new_v4().to_string())
            .form(&params)
            .send()
            .await
            .map_err(|e| KdxError::Authentication(format!("Device authorization failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Device authorization failed: HTTP {} - {}", status, body);
            let err: OAuthErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(KdxError::Authentication(format!(
                "Failed to create device flow: {}",
                err.reason()
            )));
        }

        let raw: DeviceCodeResponse = response
            .json()
            .await
            .map_err(|e| KdxError::Authentication(format!("Failed to create device flow: {}", e)))?;

        match (raw.user_code, raw.device_code) {
            (Some(user_code), Some(device_code)) if !user_code.is_empty() => {
                let verification_uri = raw.verification_uri.unwrap_or_default();
                let message = raw.message.unwrap_or_else(|| {
                    format!(
                        "To sign in, open {} and enter the code {}",
                        verification_uri, user_code
                    )
                });

                Ok(DeviceAuthorization {
                    user_code,
                    device_code: Zeroizing::new(device_code),
                    verification_uri,
                    expires_in: device_code_lifetime(raw.expires_in),
                    interval: poll_interval(raw.interval),
                    message,
                })
            }
            _ => Err(KdxError::Authentication("Failed to create device flow".into())),
        }
    }

    /// Poll the token endpoint until the user completes the device flow or it expires.
    pub async fn acquire_by_device_flow(
        &self,
        flow: &DeviceAuthorization,
    ) -> Result<TokenResponse> {
        let mut interval = flow.interval;
        let now = tokio::time::Instant::now();
        let deadline = now.checked_add(flow.expires_in).unwrap_or_else(|| {
            now + Duration::from_secs(DEFAULT_DEVICE_CODE_LIFETIME_SECS)
        });

        loop {
            tokio::time::sleep(interval).await;

            if tokio::time::Instant::now() >= deadline {
                return Err(KdxError::Authentication(
                    "Device code expired before the user completed sign-in".into(),
                ));
            }

            let params = [
                ("grant_type", GRANT_DEVICE_CODE),
                ("client_id", self.client_id.as_str()),
                ("device_code", flow.device_code.as_str()),
            ];

            match self.post_token_form(&params).await? {
                TokenReply::Issued(token) => return validate(token),
                TokenReply::Rejected(err) => match next_poll_interval(interval, err.code()) {
                    Some(next) => {
                        debug!("Device flow {}, next poll in {:?}", err.code(), next);
                        interval = next;
                    }
                    None => {
                        return Err(KdxError::Authentication(format!(
                            "Failed to acquire token: {}",
                            err.reason()
                        )))
                    }
                },
            }
        }
    }

    fn scope_with_offline_access(&self) -> String {
        let mut scopes = self.scopes.clone();
        if !scopes.iter().any(|s| s == "offline_access") {
            scopes.push("offline_access".to_string());
        }
        scopes.join(" ")
    }

    async fn post_token_form(&self, params: &[(&str, &str)]) -> Result<TokenReply> {
        let response = self
            .http_client
            .post(&self.token_url)
            .header("client-request-id", Uuid::new_v4().to_string())
            .form(params)
            .send()
            .await
            .map_err(|e| KdxError::Authentication(format!("Token acquisition failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| KdxError::Authentication(format!("Token acquisition failed: {}", e)))?;
            return Ok(TokenReply::Issued(token));
        }

        let body = response.text().await.unwrap_or_default();
        let err: OAuthErrorResponse = serde_json::from_str(&body).unwrap_or_else(|_| {
            OAuthErrorResponse {
                error: Some(format!("HTTP {}", status.as_u16())),
                error_description: None,
            }
        });

        // authorization_pending is routine while polling the device flow
        if err.code() != "authorization_pending" && err.code() != "slow_down" {
            error!(
                "Token request rejected: HTTP {} - {}",
                status,
                err.error.as_deref().unwrap_or_default()
            );
        }

        Ok(TokenReply::Rejected(err))
    }
}

fn poll_interval(interval: Option<u64>) -> Duration {
    Duration::from_secs(
        interval
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
            .clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS),
    )
}

fn device_code_lifetime(expires_in: Option<u64>) -> Duration {
    match expires_in {
        Some(secs) if secs > 0 => Duration::from_secs(secs.min(MAX_DEVICE_CODE_LIFETIME_SECS)),
        _ => Duration::from_secs(DEFAULT_DEVICE_CODE_LIFETIME_SECS),
    }
}

/// Interval before the next device flow poll, or `None` when the reply ends the flow.
fn next_poll_interval(current: Duration, code: &str) -> Option<Duration> {
    match code {
        "authorization_pending" => Some(current),
        "slow_down" => Some(current + SLOW_DOWN_STEP),
        _ => None,
    }
}

fn validate(token: TokenResponse) -> Result<TokenResponse> {
    if token.access_token.is_empty() {
        return Err(KdxError::Authentication("Received empty access token".into()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with(expires_in: Value) -> TokenResponse {
        serde_json::from_value(json!({"access_token": "t", "expires_in": expires_in})).unwrap()
    }

    #[test]
    fn test_lifetime_numeric() {
        let token = token_with(json!(1800));
        assert_eq!(
            token.lifetime_or(chrono::Duration::seconds(3600)),
            chrono::Duration::seconds(1800)
        );
    }

    #[test]
    fn test_lifetime_numeric_string() {
        let token = token_with(json!("599"));
        assert_eq!(
            token.lifetime_or(chrono::Duration::seconds(3600)),
            chrono::Duration::seconds(599)
        );
    }

    #[test]
    fn test_lifetime_falls_back_to_default() {
        let default = chrono::Duration::seconds(3600);
        assert_eq!(token_with(json!("soon")).lifetime_or(default), default);
        assert_eq!(token_with(json!(null)).lifetime_or(default), default);

        let missing: TokenResponse = serde_json::from_value(json!({"access_token": "t"})).unwrap();
        assert_eq!(missing.lifetime_or(default), default);
    }

    #[test]
    fn test_lifetime_out_of_range_falls_back_to_default() {
        let default = chrono::Duration::seconds(3600);
        assert_eq!(token_with(json!(1e17)).lifetime_or(default), default);
        assert_eq!(token_with(json!("1e300")).lifetime_or(default), default);
        assert_eq!(token_with(json!(-5)).lifetime_or(default), default);
        assert_eq!(
            token_with(json!(86400)).lifetime_or(default),
            chrono::Duration::seconds(86400)
        );
    }

    #[test]
    fn test_poll_interval_bounds() {
        assert_eq!(poll_interval(None), Duration::from_secs(5));
        assert_eq!(poll_interval(Some(0)), Duration::from_secs(1));
        assert_eq!(poll_interval(Some(3)), Duration::from_secs(3));
        assert_eq!(poll_interval(Some(u64::MAX)), Duration::from_secs(60));
    }

    #[test]
    fn test_device_code_lifetime_bounds() {
        assert_eq!(device_code_lifetime(None), Duration::from_secs(900));
        assert_eq!(device_code_lifetime(Some(0)), Duration::from_secs(900));
        assert_eq!(device_code_lifetime(Some(600)), Duration::from_secs(600));
        assert_eq!(
            device_code_lifetime(Some(u64::MAX)),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_next_poll_interval() {
        let interval = Duration::from_secs(2);
        assert_eq!(next_poll_interval(interval, "authorization_pending"), Some(interval));
        assert_eq!(
            next_poll_interval(interval, "slow_down"),
            Some(Duration::from_secs(7))
        );
        assert_eq!(next_poll_interval(interval, "expired_token"), None);
        assert_eq!(next_poll_interval(interval, "authorization_declined"), None);
    }

    #[test]
    fn test_error_reason_precedence() {
        let err: OAuthErrorResponse = serde_json::from_value(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        }))
        .unwrap();
        assert_eq!(err.reason(), "AADSTS7000215: Invalid client secret provided.");

        let err: OAuthErrorResponse =
            serde_json::from_value(json!({"error": "invalid_client"})).unwrap();
        assert_eq!(err.reason(), "invalid_client");

        assert_eq!(OAuthErrorResponse::default().reason(), "Unknown error");
    }

    #[test]
    fn test_empty_access_token_rejected() {
        let token: TokenResponse = serde_json::from_value(json!({"access_token": ""})).unwrap();
        assert!(matches!(validate(token), Err(KdxError::Authentication(_))));
    }
}
