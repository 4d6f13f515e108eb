//! The JSON API exercised in the order the dashboard page calls it.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use pricing_simulator::config::AppConfig;
use pricing_simulator::dashboard::{build_router, routes::DashboardState};

fn app() -> Router {
    let cfg = AppConfig::default();
    build_router(Arc::new(DashboardState::new(
        cfg.defaults,
        cfg.server.max_upload_bytes,
    )))
}

async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn simulate(json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/simulate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

#[tokio::test]
async fn page_load_then_strategy_switches() {
    let (status, defaults) = send(
        Request::builder().uri("/api/defaults").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["strategy"], "Cost-Plus");

    // Initial render: all costs zero, default margin.
    let (status, json) = send(simulate(serde_json::json!({
        "strategy": defaults["strategy"],
        "margin_pct": defaults["margin_pct"],
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display"]["recommended_price"], "$0.00");
    assert_eq!(json["display"]["margin_pct"], "0.00%");

    // Switch to Tiered with the default tier text.
    let (status, json) = send(simulate(serde_json::json!({
        "fixed_cost": 5, "variable_cost": 3, "service_cost": 2,
        "strategy": "Tiered",
        "tiers": defaults["tiers"],
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display"]["recommended_price"], "$22.33");
    assert_eq!(json["display"]["profit_per_unit"], "$12.33");
    assert_eq!(json["tiers"].as_array().unwrap().len(), 3);

    // Switch to Value-Based below cost: negative margin is reported.
    let (status, json) = send(simulate(serde_json::json!({
        "fixed_cost": 5, "variable_cost": 3, "service_cost": 2,
        "strategy": "Value-Based",
        "perceived_value": 8,
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display"]["profit_per_unit"], "$-2.00");
    assert_eq!(json["display"]["margin_pct"], "-25.00%");
}

#[tokio::test]
async fn upload_with_benchmark() {
    let (status, json) = send(simulate(serde_json::json!({
        "fixed_cost": 10, "variable_cost": 5, "service_cost": 5,
        "strategy": "Cost-Plus", "margin_pct": 30,
        "competitor_csv": "Competitor,Price\nAcme,24\nGlobex,30\n",
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = json["display"]["benchmark"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["delta_vs_recommended"], "$-2.00");
    assert_eq!(rows[1]["delta_vs_recommended"], "$4.00");
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_upload_degrades_to_warning() {
    let (status, json) = send(simulate(serde_json::json!({
        "fixed_cost": 1,
        "strategy": "Value-Based", "perceived_value": 5,
        "competitor_csv": "Competitor,Price\nAcme,1,2,3\n",
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["benchmark"].is_null());
    assert!(json["competitors"].is_null());
    assert_eq!(json["display"]["recommended_price"], "$5.00");
    assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bad_tiers_surface_message() {
    let (status, json) = send(simulate(serde_json::json!({
        "strategy": "Tiered",
        "tiers": "1,100,25\nfoo",
    })))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "parse_error");
    assert!(json["message"].as_str().unwrap().contains("line 2"));
}

#[tokio::test]
async fn empty_tier_table_is_rejected() {
    let (status, json) = send(simulate(serde_json::json!({
        "strategy": "Tiered",
        "tiers": "\n\n",
    })))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn huge_tier_prices_are_rejected_not_fatal() {
    let (status, json) = send(simulate(serde_json::json!({
        "strategy": "Tiered",
        "tiers": "1,1,79228162514264337593543950335\n1,1,79228162514264337593543950335",
    })))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation_error");

    // The server keeps answering after the rejected input.
    let (status, _) = send(simulate(serde_json::json!({
        "fixed_cost": 1, "strategy": "Cost-Plus", "margin_pct": 10,
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
}
