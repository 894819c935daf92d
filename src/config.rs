//! Configuration loading and management.
//!
//! Resolves every setting from explicit arguments first, then environment
//! variables, then the defaults embedded from config.toml.

use std::env;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::error::{KdxError, Result};

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

pub const ENV_BASE_URL: &str = "KYTHERA_BASE_URL";
pub const ENV_TENANT_ID: &str = "KYTHERA_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "KYTHERA_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "KYTHERA_CLIENT_SECRET";
pub const ENV_SCOPES: &str = "KYTHERA_SCOPES";
pub const ENV_AUTHORITY_HOST: &str = "KYTHERA_AUTHORITY_HOST";
pub const ENV_TIMEOUT_SECS: &str = "KYTHERA_TIMEOUT_SECS";

#[derive(Debug, Clone, Deserialize)]
struct Defaults {
    api: ApiDefaults,
    oauth: OAuthDefaults,
    token: TokenDefaults,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiDefaults {
    base_url: String,
    timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct OAuthDefaults {
    authority_host: String,
    tenant: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenDefaults {
    expiry_buffer_seconds: i64,
    default_lifetime_seconds: i64,
}

impl Defaults {
    fn embedded() -> Result<Self> {
        toml::from_str(CONFIG_TOML).map_err(|e| {
            KdxError::Configuration(format!("Failed to parse embedded config.toml: {}", e))
        })
    }

    fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            expiry_buffer: chrono::Duration::seconds(self.token.expiry_buffer_seconds),
            default_lifetime: chrono::Duration::seconds(self.token.default_lifetime_seconds),
        }
    }
}

/// Token freshness rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// A token is treated as expired this long before its real expiry.
    pub expiry_buffer: chrono::Duration,
    /// Lifetime assumed when the provider omits `expires_in` or sends garbage.
    pub default_lifetime: chrono::Duration,
}

impl TokenPolicy {
    /// The policy from the embedded config.toml.
    pub fn embedded() -> Result<Self> {
        Ok(Defaults::embedded()?.token_policy())
    }
}

/// Explicit arguments supplied by the caller. `None` falls back to the environment.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub timeout: Option<Duration>,
    pub authority_host: Option<String>,
    pub token_policy: Option<TokenPolicy>,
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("base_url", &self.base_url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("scopes", &self.scopes)
            .field("timeout", &self.timeout)
            .field("authority_host", &self.authority_host)
            .field("token_policy", &self.token_policy)
            .finish()
    }
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = Some(authority_host.into());
        self
    }

    pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = Some(policy);
        self
    }
}

/// Resolved, immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    tenant_id: String,
    client_id: String,
    client_secret: Option<Zeroizing<String>>,
    scopes: Vec<String>,
    timeout: Duration,
    authority_host: String,
    token_policy: TokenPolicy,
}

impl ClientConfig {
    /// Resolve configuration from explicit arguments and the process environment.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    /// Resolve configuration using `lookup` in place of the process environment.
    pub fn resolve_with<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Defaults::embedded()?;
        let default_policy = defaults.token_policy();
        let from_env = |key: &str| lookup(key).and_then(non_blank);

        let base_url = overrides
            .base_url
            .and_then(non_blank)
            .or_else(|| from_env(ENV_BASE_URL))
            .unwrap_or(defaults.api.base_url)
            .trim_end_matches('/')
            .to_string();
        validate_url("base URL", &base_url)?;

        let tenant_id = overrides
            .tenant_id
            .and_then(non_blank)
            .or_else(|| from_env(ENV_TENANT_ID))
            .unwrap_or(defaults.oauth.tenant);

        let client_id = overrides
            .client_id
            .and_then(non_blank)
            .or_else(|| from_env(ENV_CLIENT_ID))
            .ok_or_else(|| {
                KdxError::Configuration(format!(
                    "client_id is required. Provide it as a parameter or set the {} \
                     environment variable.",
                    ENV_CLIENT_ID
                ))
            })?;

        let client_secret = overrides
            .client_secret
            .and_then(non_blank)
            .or_else(|| from_env(ENV_CLIENT_SECRET))
            .map(Zeroizing::new);

        let scopes = match overrides.scopes {
            Some(scopes) if scopes.iter().any(|s| !s.trim().is_empty()) => clean_scopes(scopes),
            _ => from_env(ENV_SCOPES)
                .map(|raw| clean_scopes(raw.split(',').map(str::to_string)))
                .filter(|scopes| !scopes.is_empty())
                .unwrap_or_else(|| vec![format!("{}/.default", client_id)]),
        };

        let timeout = match overrides.timeout {
            Some(timeout) => timeout,
            None => match from_env(ENV_TIMEOUT_SECS) {
                Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                    KdxError::Configuration(format!(
                        "{} must be a whole number of seconds, got {:?}",
                        ENV_TIMEOUT_SECS, raw
                    ))
                })?),
                None => Duration::from_secs(defaults.api.timeout_seconds),
            },
        };

        let authority_host = overrides
            .authority_host
            .and_then(non_blank)
            .or_else(|| from_env(ENV_AUTHORITY_HOST))
            .unwrap_or(defaults.oauth.authority_host)
            .trim_end_matches('/')
            .to_string();
        validate_url("authority host", &authority_host)?;

        let token_policy = overrides.token_policy.unwrap_or(default_policy);

        Ok(Self {
            base_url,
            tenant_id,
            client_id,
            client_secret,
            scopes,
            timeout,
            authority_host,
            token_policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_ref().map(|s| s.as_str())
    }

    pub fn has_client_secret(&self) -> bool {
        self.client_secret.is_some()
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn token_policy(&self) -> TokenPolicy {
        self.token_policy
    }

    /// Authority URL, e.g. `https://login.microsoftonline.com/<tenant>`.
    pub fn authority(&self) -> String {
        format!("{}/{}", self.authority_host, self.tenant_id)
    }

    /// Get the token URL for the configured authority.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority())
    }

    /// Get the device authorization URL for the configured authority.
    pub fn device_code_url(&self) -> String {
        format!("{}/oauth2/v2.0/devicecode", self.authority())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("scopes", &self.scopes)
            .field("timeout", &self.timeout)
            .field("authority_host", &self.authority_host)
            .field("token_policy", &self.token_policy)
            .finish()
    }
}

fn validate_url(what: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| KdxError::Configuration(format!("Invalid {} {:?}: {}", what, value, e)))
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn clean_scopes<I: IntoIterator<Item = String>>(scopes: I) -> Vec<String> {
    scopes
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
