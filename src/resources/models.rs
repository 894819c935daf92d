//! Data types returned by (and sent to) the Kythera v1 endpoints.
//!
//! Field names follow the API's camelCase JSON. Nearly everything is optional
//! because the API omits fields freely.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// --- Funds ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundAdministrator {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: Option<i64>,
    pub short_name: Option<String>,
    pub full_name: Option<String>,
    pub cota_abertura: Option<bool>,
    pub is_enabled: Option<bool>,
    pub characteristics: Option<HashMap<String, String>>,
    pub administrator: Option<FundAdministrator>,
}

/// Net asset value of a fund on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundNav {
    pub id: Option<i64>,
    pub nav_type_id: Option<i64>,
    pub nav_type: Option<String>,
    pub fund_id: Option<i64>,
    pub fund_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundFamily {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_currency_id: Option<i64>,
    pub base_currency_code: Option<String>,
    pub risk_view_currency_id: Option<i64>,
    pub risk_view_currency_code: Option<String>,
}

/// Membership of a fund in a fund family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundFamilyRelation {
    pub id: Option<i64>,
    pub fund_family_id: Option<i64>,
    pub fund_family_name: Option<String>,
    pub fund_id: Option<i64>,
    pub fund_name: Option<String>,
    pub nav_multiplier: Option<f64>,
    pub risk_multiplier: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: Option<i64>,
    pub parent_portfolio_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub characteristics: Option<HashMap<String, String>>,
}

// --- Positions & trades ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: Option<i64>,
    pub is_open: Option<bool>,
    pub position_date: Option<NaiveDate>,
    pub settle_date: Option<NaiveDate>,
    pub fund_id: Option<i64>,
    pub fund_name: Option<String>,
    pub portfolio_id: Option<i64>,
    pub portfolio_name: Option<String>,
    pub instrument_group_id: Option<i64>,
    pub instrument_group_name: Option<String>,
    pub instrument_id: Option<i64>,
    pub instrument_name: Option<String>,
    pub quantity: Option<f64>,
    pub custodian_id: Option<i64>,
    pub custodian_name: Option<String>,
    pub tag_id: Option<i64>,
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: Option<i64>,
    pub trade_raw_id: Option<i64>,
    pub trade_date: Option<NaiveDate>,
    pub trade_time: Option<NaiveTime>,
    pub effective_date: Option<NaiveDate>,
    pub settlement_date: Option<NaiveDate>,
    pub fund_id: Option<i64>,
    pub fund_name: Option<String>,
    pub account_id: Option<i64>,
    pub account_name: Option<String>,
    pub portfolio_id: Option<i64>,
    pub portfolio_name: Option<String>,
    pub instrument_group_id: Option<i64>,
    pub instrument_group_name: Option<String>,
    pub instrument_id: Option<i64>,
    pub instrument_name: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub trader_id: Option<i64>,
    pub trader_name: Option<String>,
    pub dealer_id: Option<i64>,
    pub dealer_name: Option<String>,
    pub settle_dealer_id: Option<i64>,
    pub settle_dealer_name: Option<String>,
    pub tag_id: Option<i64>,
    pub tag_name: Option<String>,
    pub trade_state_id: Option<i64>,
    pub trade_state_name: Option<String>,
    pub trade_source_id: Option<i64>,
    pub trade_source_name: Option<String>,
    pub observation: Option<String>,
}

// --- Prices ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub date: Option<NaiveDate>,
    pub type_id: Option<i64>,
    pub type_name: Option<String>,
    pub source_id: Option<i64>,
    pub source_name: Option<String>,
    pub instrument_group_id: Option<i64>,
    pub instrument_group_name: Option<String>,
    pub instrument_id: Option<i64>,
    pub instrument_name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceType {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_owner: Option<String>,
}

/// Body item for `POST /v1/prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideInstrumentPrice {
    pub instrument_id: i64,
    pub price: f64,
    pub rate: f64,
}

// --- Risk factors ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub risk_factor_type_id: Option<i64>,
    pub risk_factor_type_name: Option<String>,
    pub number_of_dimensions: Option<f64>,
    pub characteristics: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactorValue {
    pub id: Option<i64>,
    pub valuation_date: Option<NaiveDate>,
    pub risk_factor_id: Option<i64>,
    pub risk_factor_name: Option<String>,
    pub risk_value_type_id: Option<i64>,
    pub risk_value_type_name: Option<String>,
    pub dimension_one_value: Option<f64>,
    pub dimension_two_value: Option<f64>,
    pub dimension_three_value: Option<f64>,
    pub dimension_four_value: Option<f64>,
    pub dimension_five_value: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskValueType {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactorPoint {
    pub risk_factor_value: Option<f64>,
    pub dimension_one: Option<f64>,
    pub dimension_two: Option<f64>,
    pub dimension_three: Option<f64>,
    pub dimension_four: Option<f64>,
    pub dimension_five: Option<f64>,
}

/// Body item for `POST /v1/risk-factor-values`. Identify the factor by id or by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRiskFactorValue {
    pub risk_factor_id: Option<i64>,
    pub risk_factor: Option<String>,
    pub risk_factor_type: String,
    pub risk_factor_point: RiskFactorPoint,
}

// --- Indexes ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub index_type: Option<String>,
    pub currency_id: Option<i64>,
    pub currency: Option<String>,
    pub characteristics: Option<HashMap<String, String>>,
}

// --- Reference data ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub two_letter_code: Option<String>,
    pub three_letter_code: Option<String>,
    pub code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub three_letter_code: Option<String>,
    pub code: Option<i64>,
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub type_id: Option<i64>,
    pub type_name: Option<String>,
    pub characteristics: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionType {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tin_number: Option<String>,
    pub country_id: Option<i64>,
    pub issuer_country_id: Option<i64>,
    pub country_name: Option<String>,
    pub issuer_country_name: Option<String>,
    pub parent_issuer_id: Option<i64>,
    pub parent_issuer_name: Option<String>,
    pub characteristics: Option<HashMap<String, String>>,
}
