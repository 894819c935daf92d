//! Typed clients for the Kythera v1 resources.
//!
//! Each client is a thin wrapper over the shared
//! [`AuthenticatedClient`](crate::api::AuthenticatedClient): it builds the
//! query, calls one endpoint and decodes the JSON. Every list endpoint also
//! has a `_raw` variant returning the undecoded [`serde_json::Value`].

pub mod fund_families;
pub mod funds;
pub mod globals;
pub mod indexes;
pub mod models;
pub mod portfolios;
pub mod positions;
pub mod prices;
pub mod risk_factors;
pub mod trades;

pub use fund_families::FundFamiliesClient;
pub use funds::{FundsClient, NavFilter};
pub use globals::GlobalsClient;
pub use indexes::IndexesClient;
pub use portfolios::PortfoliosClient;
pub use positions::PositionsClient;
pub use prices::PricesClient;
pub use risk_factors::RiskFactorsClient;
pub use trades::TradesClient;
