//! Market indexes.

use std::sync::Arc;

use serde_json::Value;

use super::models::Index;
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

pub struct IndexesClient {
    client: Arc<AuthenticatedClient>,
}

impl IndexesClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_indexes_raw(&self, include_characteristics: bool) -> Result<Value> {
        let query = Query::new().flag("include-characteristics", include_characteristics);
        self.client.get_json("/v1/indexes", Some(&query)).await
    }

    /// `GET /v1/indexes`
    pub async fn get_indexes(&self, include_characteristics: bool) -> Result<Vec<Index>> {
        let query = Query::new().flag("include-characteristics", include_characteristics);
        self.client.get_json("/v1/indexes", Some(&query)).await
    }
}
