//! Unified entry point with lazily built resource clients.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::api::AuthenticatedClient;
use crate::auth::TokenInfo;
use crate::config::{ClientConfig, ConfigOverrides};
use crate::error::Result;
use crate::resources::{
    FundFamiliesClient, FundsClient, GlobalsClient, IndexesClient, PortfoliosClient,
    PositionsClient, PricesClient, RiskFactorsClient, TradesClient,
};

/// Kythera API client.
///
/// ```no_run
/// # async fn run() -> kythera_kdx::Result<()> {
/// use kythera_kdx::{ConfigOverrides, Kdx};
///
/// let kdx = Kdx::from_overrides(
///     ConfigOverrides::new()
///         .client_id("your-client-id")
///         .client_secret("your-client-secret"),
/// )?;
/// let funds = kdx.funds().get_funds(true, false).await?;
/// println!("{} funds", funds.len());
/// # Ok(())
/// # }
/// ```
pub struct Kdx {
    client: Arc<AuthenticatedClient>,
    fund_families: OnceCell<FundFamiliesClient>,
    funds: OnceCell<FundsClient>,
    globals: OnceCell<GlobalsClient>,
    indexes: OnceCell<IndexesClient>,
    portfolios: OnceCell<PortfoliosClient>,
    positions: OnceCell<PositionsClient>,
    prices: OnceCell<PricesClient>,
    risk_factors: OnceCell<RiskFactorsClient>,
    trades: OnceCell<TradesClient>,
}

impl Kdx {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_client(AuthenticatedClient::new(config)?))
    }

    /// Resolve configuration from `overrides` plus the environment.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        Self::new(ClientConfig::load(overrides)?)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_overrides(ConfigOverrides::default())
    }

    /// Wrap an existing client, e.g. one built with a device code handler.
    pub fn with_client(client: AuthenticatedClient) -> Self {
        Self {
            client: Arc::new(client),
            fund_families: OnceCell::new(),
            funds: OnceCell::new(),
            globals: OnceCell::new(),
            indexes: OnceCell::new(),
            portfolios: OnceCell::new(),
            positions: OnceCell::new(),
            prices: OnceCell::new(),
            risk_factors: OnceCell::new(),
            trades: OnceCell::new(),
        }
    }

    /// The shared dispatcher, for endpoints without a typed client.
    pub fn client(&self) -> &Arc<AuthenticatedClient> {
        &self.client
    }

    pub fn fund_families(&self) -> &FundFamiliesClient {
        self.fund_families
            .get_or_init(|| FundFamiliesClient::new(Arc::clone(&self.client)))
    }

    pub fn funds(&self) -> &FundsClient {
        self.funds
            .get_or_init(|| FundsClient::new(Arc::clone(&self.client)))
    }

    /// Reference data: calendars, countries, currencies, institutions, issuers.
    pub fn globals(&self) -> &GlobalsClient {
        self.globals
            .get_or_init(|| GlobalsClient::new(Arc::clone(&self.client)))
    }

    pub fn indexes(&self) -> &IndexesClient {
        self.indexes
            .get_or_init(|| IndexesClient::new(Arc::clone(&self.client)))
    }

    pub fn portfolios(&self) -> &PortfoliosClient {
        self.portfolios
            .get_or_init(|| PortfoliosClient::new(Arc::clone(&self.client)))
    }

    pub fn positions(&self) -> &PositionsClient {
        self.positions
            .get_or_init(|| PositionsClient::new(Arc::clone(&self.client)))
    }

    pub fn prices(&self) -> &PricesClient {
        self.prices
            .get_or_init(|| PricesClient::new(Arc::clone(&self.client)))
    }

    pub fn risk_factors(&self) -> &RiskFactorsClient {
        self.risk_factors
            .get_or_init(|| RiskFactorsClient::new(Arc::clone(&self.client)))
    }

    pub fn trades(&self) -> &TradesClient {
        self.trades
            .get_or_init(|| TradesClient::new(Arc::clone(&self.client)))
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    pub fn get_token_info(&self) -> TokenInfo {
        self.client.get_token_info()
    }

    pub fn clear_token_cache(&self) {
        self.client.clear_token_cache();
    }
}
