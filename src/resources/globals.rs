//! Reference data under `/v1/globals`.

use std::sync::Arc;

use serde_json::Value;

use super::models::{Calendar, Country, Currency, Institution, InstitutionType, Issuer};
use crate::api::{AuthenticatedClient, Query};
use crate::error::Result;

const CALENDARS: &str = "/v1/globals/calendars";
const COUNTRIES: &str = "/v1/globals/countries";
const CURRENCIES: &str = "/v1/globals/currencies";
const INSTITUTIONS: &str = "/v1/globals/institutions";
const INSTITUTION_TYPES: &str = "/v1/globals/institutions/types";
const ISSUERS: &str = "/v1/globals/issuers";

pub struct GlobalsClient {
    client: Arc<AuthenticatedClient>,
}

impl GlobalsClient {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub async fn get_calendars_raw(&self) -> Result<Value> {
        self.client.get_json(CALENDARS, None).await
    }

    pub async fn get_calendars(&self) -> Result<Vec<Calendar>> {
        self.client.get_json(CALENDARS, None).await
    }

    pub async fn get_countries_raw(&self) -> Result<Value> {
        self.client.get_json(COUNTRIES, None).await
    }

    pub async fn get_countries(&self) -> Result<Vec<Country>> {
        self.client.get_json(COUNTRIES, None).await
    }

    pub async fn get_currencies_raw(&self) -> Result<Value> {
        self.client.get_json(CURRENCIES, None).await
    }

    pub async fn get_currencies(&self) -> Result<Vec<Currency>> {
        self.client.get_json(CURRENCIES, None).await
    }

    pub async fn get_institutions_raw(
        &self,
        fetch_characteristics: bool,
        fetch_nomenclatures: bool,
    ) -> Result<Value> {
        let query = institutions_query(fetch_characteristics, fetch_nomenclatures);
        self.client.get_json(INSTITUTIONS, Some(&query)).await
    }

    pub async fn get_institutions(
        &self,
        fetch_characteristics: bool,
        fetch_nomenclatures: bool,
    ) -> Result<Vec<Institution>> {
        let query = institutions_query(fetch_characteristics, fetch_nomenclatures);
        self.client.get_json(INSTITUTIONS, Some(&query)).await
    }

    pub async fn get_institution_types_raw(&self) -> Result<Value> {
        self.client.get_json(INSTITUTION_TYPES, None).await
    }

    pub async fn get_institution_types(&self) -> Result<Vec<InstitutionType>> {
        self.client.get_json(INSTITUTION_TYPES, None).await
    }

    pub async fn get_issuers_raw(&self, fetch_characteristics: bool) -> Result<Value> {
        let query = Query::new().flag("fetchCharacteristics", fetch_characteristics);
        self.client.get_json(ISSUERS, Some(&query)).await
    }

    pub async fn get_issuers(&self, fetch_characteristics: bool) -> Result<Vec<Issuer>> {
        let query = Query::new().flag("fetchCharacteristics", fetch_characteristics);
        self.client.get_json(ISSUERS, Some(&query)).await
    }
}

fn institutions_query(fetch_characteristics: bool, fetch_nomenclatures: bool) -> Query {
    Query::new()
        .flag("fetchCharacteristics", fetch_characteristics)
        .flag("fetchNomenclatures", fetch_nomenclatures)
}
