//! Instrument price endpoints.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::models::{OverrideInstrumentPrice, Price, PriceType};
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

pub struct PricesClient {
    client: Arc<AuthenticatedClient>,
}

impl PricesClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_all_prices_raw(
        &self,
        price_date: NaiveDate,
        price_type_name: &str,
    ) -> Result<Value> {
        let query = price_query(price_date, price_type_name);
        self.client.get_json("/v1/prices", Some(&query)).await
    }

    /// `GET /v1/prices` for one date and price type (e.g. `CLOSE`).
    pub async fn get_all_prices(
        &self,
        price_date: NaiveDate,
        price_type_name: &str,
    ) -> Result<Vec<Price>> {
        let query = price_query(price_date, price_type_name);
        self.client.get_json("/v1/prices", Some(&query)).await
    }

    pub async fn get_prices_by_instrument_raw(
        &self,
        instrument_id: i64,
        price_date: NaiveDate,
        price_type_name: &str,
    ) -> Result<Value> {
        let query = price_query(price_date, price_type_name);
        self.client
            .get_json(&instrument_path(instrument_id), Some(&query))
            .await
    }

    /// `GET /v1/prices/{instrumentId}`
    pub async fn get_prices_by_instrument(
        &self,
        instrument_id: i64,
        price_date: NaiveDate,
        price_type_name: &str,
    ) -> Result<Vec<Price>> {
        let query = price_query(price_date, price_type_name);
        self.client
            .get_json(&instrument_path(instrument_id), Some(&query))
            .await
    }

    /// `POST /v1/prices`. Publishes overrides; the response body is ignored.
    pub async fn post_prices(&self, prices: &[OverrideInstrumentPrice]) -> Result<()> {
        self.client.post("/v1/prices", Some(prices)).await?;
        Ok(())
    }

    pub async fn get_price_types_raw(&self) -> Result<Value> {
        self.client.get_json("/v1/prices/price-types", None).await
    }

    /// `GET /v1/prices/price-types`
    pub async fn get_price_types(&self) -> Result<Vec<PriceType>> {
        self.client.get_json("/v1/prices/price-types", None).await
    }
}

fn instrument_path(instrument_id: i64) -> String {
    format!("/v1/prices/{}", instrument_id)
}

fn price_query(price_date: NaiveDate, price_type_name: &str) -> Query {
    Query::new()
        .date("priceDate", price_date)
        .param("priceTypeName", price_type_name)
}
