//! Kythera KDX - typed async client for the Kythera financial data API.
//!
//! Authenticates against Azure AD (client credentials for service principals,
//! device code for interactive use), attaches bearer tokens to every request
//! and maps failures onto [`KdxError`].

#![deny(clippy::all)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod kdx;
pub mod resources;

pub use api::{AuthenticatedClient, Query};
pub use auth::{AuthFlow, DeviceCodeHandler, DeviceCodePrompt, TokenInfo};
pub use config::{ClientConfig, ConfigOverrides, TokenPolicy};
pub use error::{KdxError, Result};
pub use kdx::Kdx;
