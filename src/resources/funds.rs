//! Funds and fund NAV endpoints.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::models::{Fund, FundNav};
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

/// Filters for `GET /v1/funds/navs`. Either a single `date` or a range.
#[derive(Debug, Clone, Default)]
pub struct NavFilter {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub fund_id: Option<i64>,
}

impl NavFilter {
    fn query(&self) -> Query {
        Query::new()
            .opt_date("date", self.date)
            .opt_date("startDate", self.start_date)
            .opt_date("endDate", self.end_date)
            .opt("fundId", self.fund_id)
    }
}

pub struct FundsClient {
    client: Arc<AuthenticatedClient>,
}

impl FundsClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// `GET /v1/funds` as raw JSON.
    pub async fn get_funds_raw(
        &self,
        enabled_only: bool,
        fetch_characteristics: bool,
    ) -> Result<Value> {
        let query = funds_query(enabled_only, fetch_characteristics);
        self.client.get_json("/v1/funds", Some(&query)).await
    }

    /// `GET /v1/funds`
    pub async fn get_funds(
        &self,
        enabled_only: bool,
        fetch_characteristics: bool,
    ) -> Result<Vec<Fund>> {
        let query = funds_query(enabled_only, fetch_characteristics);
        self.client.get_json("/v1/funds", Some(&query)).await
    }

    pub async fn get_fund_navs_raw(&self, filter: &NavFilter) -> Result<Value> {
        self.client
            .get_json("/v1/funds/navs", Some(&filter.query()))
            .await
    }

    /// `GET /v1/funds/navs`
    pub async fn get_fund_navs(&self, filter: &NavFilter) -> Result<Vec<FundNav>> {
        self.client
            .get_json("/v1/funds/navs", Some(&filter.query()))
            .await
    }
}

fn funds_query(enabled_only: bool, fetch_characteristics: bool) -> Query {
    Query::new()
        .flag("enabledOnly", enabled_only)
        .flag("fetchCharacteristics", fetch_characteristics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_filter_query_skips_unset_fields() {
        let filter = NavFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            fund_id: Some(12),
            ..Default::default()
        };

        let query = filter.query();
        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["startDate", "endDate", "fundId"]);
    }
}
