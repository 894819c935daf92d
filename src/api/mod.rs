//! Authenticated HTTP access to the Kythera REST API.

pub mod client;
pub mod query;

pub use client::AuthenticatedClient;
pub use query::Query;
