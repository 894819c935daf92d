//! Azure AD authentication.
//!
//! Provides the OAuth2 client credentials and device code flows and the
//! token cache that decides when to use them.

pub mod oauth;
pub mod token_manager;

pub use token_manager::{AuthFlow, DeviceCodeHandler, DeviceCodePrompt, TokenInfo, TokenManager};
