//! Risk factor definitions and values.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::models::{OverrideRiskFactorValue, RiskFactor, RiskFactorValue, RiskValueType};
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

pub struct RiskFactorsClient {
    client: Arc<AuthenticatedClient>,
}

impl RiskFactorsClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_risk_factors_raw(&self, include_characteristics: bool) -> Result<Value> {
        let query = Query::new().flag("include-characteristics", include_characteristics);
        self.client.get_json("/v1/risk-factors", Some(&query)).await
    }

    /// `GET /v1/risk-factors`
    pub async fn get_risk_factors(&self, include_characteristics: bool) -> Result<Vec<RiskFactor>> {
        let query = Query::new().flag("include-characteristics", include_characteristics);
        self.client.get_json("/v1/risk-factors", Some(&query)).await
    }

    pub async fn get_risk_factor_values_raw(&self, valuation_date: NaiveDate) -> Result<Value> {
        let query = Query::new().date("valuation-date", valuation_date);
        self.client
            .get_json("/v1/risk-factor-values", Some(&query))
            .await
    }

    /// `GET /v1/risk-factor-values` for one valuation date.
    pub async fn get_risk_factor_values(
        &self,
        valuation_date: NaiveDate,
    ) -> Result<Vec<RiskFactorValue>> {
        let query = Query::new().date("valuation-date", valuation_date);
        self.client
            .get_json("/v1/risk-factor-values", Some(&query))
            .await
    }

    /// `POST /v1/risk-factor-values`
    pub async fn post_risk_factor_values(&self, values: &[OverrideRiskFactorValue]) -> Result<()> {
        self.client.post("/v1/risk-factor-values", Some(values)).await?;
        Ok(())
    }

    pub async fn get_risk_factor_value_types_raw(&self) -> Result<Value> {
        self.client
            .get_json("/v1/risk-factor-values/types", None)
            .await
    }

    /// `GET /v1/risk-factor-values/types`
    pub async fn get_risk_factor_value_types(&self) -> Result<Vec<RiskValueType>> {
        self.client
            .get_json("/v1/risk-factor-values/types", None)
            .await
    }
}
