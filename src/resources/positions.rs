//! Positions endpoint.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use super::models::Position;
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

pub struct PositionsClient {
    client: Arc<AuthenticatedClient>,
}

impl PositionsClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_positions_raw(
        &self,
        position_date: Option<NaiveDate>,
        is_open: bool,
    ) -> Result<Value> {
        let query = positions_query(position_date, is_open);
        self.client.get_json("/v1/positions", Some(&query)).await
    }

    /// `GET /v1/positions` for a date (server default when `None`).
    pub async fn get_positions(
        &self,
        position_date: Option<NaiveDate>,
        is_open: bool,
    ) -> Result<Vec<Position>> {
        let query = positions_query(position_date, is_open);
        self.client.get_json("/v1/positions", Some(&query)).await
    }
}

fn positions_query(position_date: Option<NaiveDate>, is_open: bool) -> Query {
    Query::new()
        .opt_date("positionDate", position_date)
        .flag("isOpen", is_open)
}
