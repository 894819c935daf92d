//! Fund families and their fund memberships.

use std::sync::Arc;

use serde_json::Value;

use super::models::{FundFamily, FundFamilyRelation};
use crate::api::AuthenticatedClient;
use crate::error::Result;

pub struct FundFamiliesClient {
    client: Arc<AuthenticatedClient>,
}

impl FundFamiliesClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_fund_families_raw(&self) -> Result<Value> {
        self.client.get_json("/v1/fund-families", None).await
    }

    /// `GET /v1/fund-families`
    pub async fn get_fund_families(&self) -> Result<Vec<FundFamily>> {
        self.client.get_json("/v1/fund-families", None).await
    }

    pub async fn get_fund_family_relations_raw(&self) -> Result<Value> {
        self.client
            .get_json("/v1/fund-families-relations", None)
            .await
    }

    /// `GET /v1/fund-families-relations`: which funds belong to which family,
    /// with their NAV and risk multipliers.
    pub async fn get_fund_family_relations(&self) -> Result<Vec<FundFamilyRelation>> {
        self.client
            .get_json("/v1/fund-families-relations", None)
            .await
    }
}
