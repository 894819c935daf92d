//! Portfolios endpoint.

use std::sync::Arc;

use serde_json::Value;

use super::models::Portfolio;
use crate::api::AuthenticatedClient;
use crate::error::Result;

pub struct PortfoliosClient {
    client: Arc<AuthenticatedClient>,
}

impl PortfoliosClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_portfolios_raw(&self) -> Result<Value> {
        self.client.get_json("/v1/portfolios", None).await
    }

    /// `GET /v1/portfolios`
    pub async fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.client.get_json("/v1/portfolios", None).await
    }
}
