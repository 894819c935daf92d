//! Access token lifecycle: cache, expiry checks and acquisition for both flows.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::auth::oauth::{IdentityClient, TokenResponse};
use crate::config::{ClientConfig, TokenPolicy};
use crate::error::Result;

/// Which OAuth2 flow a [`TokenManager`] uses. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    /// Confidential client, client credentials grant.
    ServicePrincipal,
    /// Public client, silent refresh then device code grant.
    DeviceFlow,
}

impl AuthFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServicePrincipal => "service_principal",
            Self::DeviceFlow => "device_flow",
        }
    }
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign-in instructions for the device code flow.
#[derive(Debug, Clone)]
pub struct DeviceCodePrompt {
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: StdDuration,
    /// Ready-to-display instructions from the provider.
    pub message: String,
}

/// Receives device code instructions so the caller decides how to show them.
pub type DeviceCodeHandler = Arc<dyn Fn(&DeviceCodePrompt) + Send + Sync>;

fn log_device_code(prompt: &DeviceCodePrompt) {
    info!("{}", prompt.message);
}

#[derive(Clone)]
struct CachedToken {
    access_token: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

/// Cached token plus the remembered account used for silent acquisition.
#[derive(Clone, Default)]
pub struct TokenState {
    cached: Option<CachedToken>,
    /// Refresh token from the last device flow sign-in.
    account: Option<Zeroizing<String>>,
    /// Bumped on every clear so an in-flight acquisition can tell it is stale.
    generation: u64,
}

impl TokenState {
    /// Replace the cached token.
    pub fn store(&mut self, access_token: String, expires_at: DateTime<Utc>) {
        self.cached = Some(CachedToken {
            access_token: Zeroizing::new(access_token),
            expires_at,
        });
    }

    pub fn has_token(&self) -> bool {
        self.cached.is_some()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cached.as_ref().map(|c| c.expires_at)
    }

    /// True unless a token exists and `now < expires_at - buffer`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        match &self.cached {
            Some(cached) => now >= cached.expires_at - buffer,
            None => true,
        }
    }

    /// The cached token, if it is still usable at `now`.
    pub fn usable_token_at(&self, now: DateTime<Utc>, buffer: Duration) -> Option<&str> {
        if self.is_expired_at(now, buffer) {
            return None;
        }
        self.cached.as_ref().map(|c| c.access_token.as_str())
    }

    pub fn clear(&mut self) {
        self.cached = None;
        self.account = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Snapshot of the token state. Reading it never performs I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub has_token: bool,
    pub is_expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// Time until the real expiry (negative once passed).
    pub time_to_expiry: Option<Duration>,
    pub auth_type: AuthFlow,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.has_token, self.time_to_expiry) {
            (true, Some(remaining)) if remaining > Duration::zero() => write!(
                f,
                "{} token, expires in {}{}",
                self.auth_type,
                format_duration(remaining),
                if self.is_expired { " (refresh due)" } else { "" }
            ),
            (true, _) => write!(f, "{} token, expired", self.auth_type),
            (false, _) => write!(f, "{}, no token", self.auth_type),
        }
    }
}

/// Acquires, caches and refreshes access tokens.
///
/// Concurrent callers share one acquisition: the refresh gate is held across the
/// whole check-acquire-store sequence.
pub struct TokenManager {
    identity: IdentityClient,
    flow: AuthFlow,
    policy: TokenPolicy,
    state: Mutex<TokenState>,
    refresh_gate: tokio::sync::Mutex<()>,
    device_code_handler: DeviceCodeHandler,
}

impl TokenManager {
    /// Create a token manager. The flow is chosen from the presence of a client secret.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let flow = if config.has_client_secret() {
            AuthFlow::ServicePrincipal
        } else {
            AuthFlow::DeviceFlow
        };

        let identity = IdentityClient::new(config)?;
        info!(
            "Initialized {} authentication for client {}",
            flow,
            config.client_id()
        );

        Ok(Self {
            identity,
            flow,
            policy: config.token_policy(),
            state: Mutex::new(TokenState::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
            device_code_handler: Arc::new(log_device_code),
        })
    }

    /// Replace the hook that shows device code instructions.
    pub fn with_device_code_handler(mut self, handler: DeviceCodeHandler) -> Self {
        self.device_code_handler = handler;
        self
    }

    pub fn flow(&self) -> AuthFlow {
        self.flow
    }

    fn state(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_token(&self) -> Option<String> {
        self.state()
            .usable_token_at(Utc::now(), self.policy.expiry_buffer)
            .map(str::to_string)
    }

    /// Return a usable access token, acquiring a new one when needed.
    ///
    /// With `force_refresh` the cache (and, for the device flow, silent
    /// acquisition) is bypassed. A failed acquisition leaves the previous
    /// token in place.
    pub async fn get_token(&self, force_refresh: bool) -> Result<String> {
        if !force_refresh {
            if let Some(token) = self.cached_token() {
                return Ok(token);
            }
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while we waited
        if !force_refresh {
            if let Some(token) = self.cached_token() {
                return Ok(token);
            }
        }

        let generation = self.state().generation;
        let response = match self.flow {
            AuthFlow::ServicePrincipal => self.identity.acquire_for_client().await?,
            AuthFlow::DeviceFlow => self.acquire_public(force_refresh).await?,
        };

        Ok(self.store(response, generation))
    }

    async fn acquire_public(&self, force_refresh: bool) -> Result<TokenResponse> {
        if !force_refresh {
            let account = self.state().account.clone();
            if let Some(refresh_token) = account {
                match self.identity.acquire_by_refresh_token(&refresh_token).await {
                    Ok(response) => {
                        info!("Successfully acquired access token silently");
                        return Ok(response);
                    }
                    Err(e) => {
                        debug!("Silent acquisition failed, falling back to device flow: {}", e)
                    }
                }
            }
        }

        let flow = self.identity.initiate_device_flow().await?;
        let prompt = DeviceCodePrompt {
            user_code: flow.user_code.clone(),
            verification_uri: flow.verification_uri.clone(),
            expires_in: flow.expires_in,
            message: flow.message.clone(),
        };
        (self.device_code_handler)(&prompt);

        let response = self.identity.acquire_by_device_flow(&flow).await?;
        info!("Successfully acquired access token using device code flow");
        Ok(response)
    }

    /// Cache `response` unless the cache was cleared after `generation` was read.
    /// The token is returned either way.
    fn store(&self, response: TokenResponse, generation: u64) -> String {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(response.lifetime_or(self.policy.default_lifetime))
            .or_else(|| now.checked_add_signed(self.policy.default_lifetime))
            .unwrap_or(now);
        let token = response.access_token.clone();

        let mut state = self.state();
        if state.generation != generation {
            debug!("Token cache cleared during acquisition, not caching the new token");
            return token;
        }
        state.store(response.access_token, expires_at);
        if let Some(refresh_token) = response.refresh_token {
            state.account = Some(Zeroizing::new(refresh_token));
        }

        info!("Access token acquired, expires at {}", expires_at);
        token
    }

    /// Forget the cached token and any remembered account.
    ///
    /// An acquisition already in flight still hands its token to its caller
    /// but does not repopulate the cache.
    pub fn clear_cache(&self) {
        self.state().clear();
        info!("Token cache cleared");
    }

    /// True when a token is cached and outside the expiry buffer.
    pub fn is_authenticated(&self) -> bool {
        !self
            .state()
            .is_expired_at(Utc::now(), self.policy.expiry_buffer)
    }

    pub fn token_info(&self) -> TokenInfo {
        let now = Utc::now();
        let state = self.state();
        let expires_at = state.expires_at();

        TokenInfo {
            has_token: state.has_token(),
            is_expired: state.is_expired_at(now, self.policy.expiry_buffer),
            expires_at,
            time_to_expiry: expires_at.map(|at| at - now),
            auth_type: self.flow,
        }
    }
}

/// Format duration as human-readable string (e.g., "45 min", "1 hour").
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();

    if total_minutes < 1 {
        "< 1 min".to_string()
    } else if total_minutes < 60 {
        format!("{} min", total_minutes)
    } else {
        let hours = total_minutes / 60;
        let mins = total_minutes % 60;
        if mins == 0 {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;

    fn config(secret: Option<&str>) -> ClientConfig {
        let mut overrides = ConfigOverrides::new().client_id("client");
        if let Some(secret) = secret {
            overrides = overrides.client_secret(secret);
        }
        ClientConfig::resolve_with(overrides, |_| None).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "< 1 min");
        assert_eq!(format_duration(Duration::minutes(5)), "5 min");
        assert_eq!(format_duration(Duration::minutes(45)), "45 min");
        assert_eq!(format_duration(Duration::hours(1)), "1 hour");
        assert_eq!(format_duration(Duration::hours(2)), "2 hours");
        assert_eq!(format_duration(Duration::minutes(90)), "1h 30m");
    }

    #[test]
    fn test_expiry_buffer() {
        let buffer = Duration::seconds(300);
        let acquired = Utc::now();
        let mut state = TokenState::default();
        state.store("token".into(), acquired + Duration::seconds(3600));

        assert!(!state.is_expired_at(acquired + Duration::seconds(3000), buffer));
        assert_eq!(
            state.usable_token_at(acquired + Duration::seconds(3000), buffer),
            Some("token")
        );
        assert!(state.is_expired_at(acquired + Duration::seconds(3300), buffer));
        assert!(state.is_expired_at(acquired + Duration::seconds(3400), buffer));
        assert_eq!(
            state.usable_token_at(acquired + Duration::seconds(3400), buffer),
            None
        );
    }

    #[test]
    fn test_empty_state_is_expired() {
        let state = TokenState::default();
        assert!(!state.has_token());
        assert!(state.is_expired_at(Utc::now(), Duration::seconds(300)));
        assert_eq!(state.expires_at(), None);
    }

    #[test]
    fn test_flow_selected_from_secret() {
        let manager = TokenManager::new(&config(Some("secret"))).unwrap();
        assert_eq!(manager.flow(), AuthFlow::ServicePrincipal);
        assert_eq!(manager.token_info().auth_type.as_str(), "service_principal");

        let manager = TokenManager::new(&config(None)).unwrap();
        assert_eq!(manager.flow(), AuthFlow::DeviceFlow);
        assert_eq!(manager.token_info().auth_type.as_str(), "device_flow");
    }

    #[test]
    fn test_clear_cache_resets_state() {
        let manager = TokenManager::new(&config(Some("secret"))).unwrap();
        manager
            .state()
            .store("token".into(), Utc::now() + Duration::hours(1));
        manager.state().account = Some(Zeroizing::new("refresh".into()));
        assert!(manager.is_authenticated());

        manager.clear_cache();

        let info = manager.token_info();
        assert!(!info.has_token);
        assert!(info.is_expired);
        assert_eq!(info.expires_at, None);
        assert_eq!(info.time_to_expiry, None);
        assert!(manager.state().account.is_none());
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_token_info_display() {
        let info = TokenInfo {
            has_token: true,
            is_expired: false,
            expires_at: None,
            time_to_expiry: Some(Duration::minutes(90)),
            auth_type: AuthFlow::ServicePrincipal,
        };
        assert_eq!(info.to_string(), "service_principal token, expires in 1h 30m");

        let info = TokenInfo {
            has_token: false,
            is_expired: true,
            expires_at: None,
            time_to_expiry: None,
            auth_type: AuthFlow::DeviceFlow,
        };
        assert_eq!(info.to_string(), "device_flow, no token");
    }

    fn token_response(body: serde_json::Value) -> TokenResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_huge_lifetime_uses_default() {
        let manager = TokenManager::new(&config(Some("secret"))).unwrap();
        let generation = manager.state().generation;
        let before = Utc::now();

        let token = manager.store(
            token_response(serde_json::json!({"access_token": "t", "expires_in": 1e17})),
            generation,
        );

        assert_eq!(token, "t");
        let expires_at = manager.token_info().expires_at.unwrap();
        assert!(expires_at >= before + Duration::seconds(3600));
        assert!(expires_at <= Utc::now() + Duration::seconds(3600));
    }

    #[test]
    fn test_clear_during_acquisition_discards_token() {
        let manager = TokenManager::new(&config(Some("secret"))).unwrap();
        let generation = manager.state().generation;

        manager.clear_cache();
        let token = manager.store(
            token_response(serde_json::json!({"access_token": "late", "refresh_token": "r"})),
            generation,
        );

        assert_eq!(token, "late");
        let info = manager.token_info();
        assert!(!info.has_token);
        assert!(manager.state().account.is_none());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_cached_token_needs_no_network() {
        // Authority points nowhere; a cache hit must not touch it
        let manager = TokenManager::new(&config(Some("secret"))).unwrap();
        manager
            .state()
            .store("cached".into(), Utc::now() + Duration::hours(1));

        assert_eq!(manager.get_token(false).await.unwrap(), "cached");
    }
}
