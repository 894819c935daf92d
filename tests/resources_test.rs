mod common;

use chrono::NaiveDate;
use common::mount_token;
use kythera_kdx::resources::models::{
    OverrideInstrumentPrice, OverrideRiskFactorValue, RiskFactorPoint,
};
use kythera_kdx::resources::NavFilter;
use kythera_kdx::{Kdx, KdxError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn kdx(server: &MockServer) -> Kdx {
    mount_token(server, "token").await;
    Kdx::with_client(common::service_principal(server))
}

#[tokio::test]
async fn funds_are_decoded() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/funds"))
        .and(query_param("enabledOnly", "true"))
        .and(query_param("fetchCharacteristics", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "shortName": "KDX FIM", "isEnabled": true},
            {
                "id": 8,
                "shortName": "KDX PREV",
                "isEnabled": true,
                "administrator": {"id": 2, "name": "Admin"}
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let funds = kdx.funds().get_funds(true, false).await.expect("funds");

    assert_eq!(funds.len(), 2);
    assert_eq!(funds[0].short_name.as_deref(), Some("KDX FIM"));
    assert_eq!(
        funds[1].administrator.as_ref().and_then(|a| a.name.as_deref()),
        Some("Admin")
    );
    assert!(kdx.is_authenticated());
}

#[tokio::test]
async fn fund_navs_send_only_set_filters() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/funds/navs"))
        .and(query_param("date", "2024-03-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"fundId": 7, "date": "2024-03-28", "navType": "CLOSE", "value": 1.2345}
        ])))
        .mount(&server)
        .await;

    let filter = NavFilter {
        date: NaiveDate::from_ymd_opt(2024, 3, 28),
        ..Default::default()
    };
    let navs = kdx.funds().get_fund_navs(&filter).await.expect("navs");

    assert_eq!(navs.len(), 1);
    assert_eq!(navs[0].value, Some(1.2345));
    assert_eq!(navs[0].date, NaiveDate::from_ymd_opt(2024, 3, 28));
}

#[tokio::test]
async fn prices_by_instrument_use_path_and_query() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/prices/42"))
        .and(query_param("priceDate", "2024-05-02"))
        .and(query_param("priceTypeName", "CLOSE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"instrumentId": 42, "instrumentName": "PETR4", "price": 38.5, "date": "2024-05-02"}
        ])))
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let prices = kdx
        .prices()
        .get_prices_by_instrument(42, date, "CLOSE")
        .await
        .expect("prices");

    assert_eq!(prices[0].instrument_name.as_deref(), Some("PETR4"));
    assert_eq!(prices[0].price, Some(38.5));
}

#[tokio::test]
async fn posted_prices_use_api_field_names() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/prices"))
        .and(body_json(json!([{"instrumentId": 42, "price": 38.5, "rate": 0.0}])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    kdx.prices()
        .post_prices(&[OverrideInstrumentPrice {
            instrument_id: 42,
            price: 38.5,
            rate: 0.0,
        }])
        .await
        .expect("post prices");
}

#[tokio::test]
async fn rejected_risk_factor_values_surface_api_error() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/risk-factor-values"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "Unknown risk factor"})),
        )
        .mount(&server)
        .await;

    let err = kdx
        .risk_factors()
        .post_risk_factor_values(&[OverrideRiskFactorValue {
            risk_factor_id: None,
            risk_factor: Some("NOPE".into()),
            risk_factor_type: "Curve".into(),
            risk_factor_point: RiskFactorPoint {
                risk_factor_value: Some(0.1),
                ..Default::default()
            },
        }])
        .await
        .unwrap_err();

    assert!(matches!(err, KdxError::Api { status: Some(422), .. }));
    assert_eq!(err.payload()["error"], "Unknown risk factor");
}

#[tokio::test]
async fn positions_and_trades_pass_dates() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/positions"))
        .and(query_param("positionDate", "2024-05-02"))
        .and(query_param("isOpen", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "fundId": 7, "instrumentName": "PETR4", "quantity": 1000.0}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/trades"))
        .and(query_param("effectiveDate", "2024-05-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "tradeTime": "10:15:00", "price": 38.1}
        ])))
        .mount(&server)
        .await;

    let date = NaiveDate::from_ymd_opt(2024, 5, 2);
    let positions = kdx.positions().get_positions(date, true).await.expect("positions");
    let trades = kdx.trades().get_trades(date).await.expect("trades");

    assert_eq!(positions[0].quantity, Some(1000.0));
    assert_eq!(trades[0].price, Some(38.1));
}

#[tokio::test]
async fn calendars_default_to_no_holidays() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/globals/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "ANBIMA", "holidays": ["2024-01-01"]},
            {"id": 2, "name": "NYSE"}
        ])))
        .mount(&server)
        .await;

    let calendars = kdx.globals().get_calendars().await.expect("calendars");

    assert_eq!(calendars[0].holidays, vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()]);
    assert!(calendars[1].holidays.is_empty());
}

#[tokio::test]
async fn fund_families_portfolios_and_indexes_are_decoded() {
    let server = MockServer::start().await;
    let kdx = kdx(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/fund-families-relations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"fundFamilyId": 1, "fundFamilyName": "Macro", "fundId": 7, "navMultiplier": 0.5}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/portfolios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "parentPortfolioId": 1, "name": "Rates"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/indexes"))
        .and(query_param("include-characteristics", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "CDI", "type": "Rate", "currency": "BRL"}
        ])))
        .mount(&server)
        .await;

    let relations = kdx
        .fund_families()
        .get_fund_family_relations()
        .await
        .expect("relations");
    let portfolios = kdx.portfolios().get_portfolios().await.expect("portfolios");
    let indexes = kdx.indexes().get_indexes_raw(true).await.expect("indexes");

    assert_eq!(relations[0].nav_multiplier, Some(0.5));
    assert_eq!(portfolios[0].parent_portfolio_id, Some(1));
    assert_eq!(indexes[0]["type"], "Rate");
}
