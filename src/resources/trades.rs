//! Trades endpoint.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::models::Trade;
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

pub struct TradesClient {
    client: Arc<AuthenticatedClient>,
}

impl TradesClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_trades_raw(&self, effective_date: Option<NaiveDate>) -> Result<Value> {
        let query = Query::new().opt_date("effectiveDate", effective_date);
        self.client.get_json("/v1/trades", Some(&query)).await
    }

    /// `GET /v1/trades`
    pub async fn get_trades(&self, effective_date: Option<NaiveDate>) -> Result<Vec<Trade>> {
        let query = Query::new().opt_date("effectiveDate", effective_date);
        self.client.get_json("/v1/trades", Some(&query)).await
    }
}
