//! Integration tests for the feature service router
//!
//! Requests are driven through the full router (middleware included) with
//! `tower::ServiceExt::oneshot`; no socket is opened.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bureau_features_api::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(ServerConfig::default()).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn structured_contracts() -> Value {
    json!([
        {
            "contract_id": "522530", "bank": "003", "summa": "500000000", "loan_summa": "0",
            "claim_date": "13.02.2020", "claim_id": "609965", "contract_date": "17.02.2020"
        },
        {
            "contract_id": "", "bank": "014", "summa": "", "loan_summa": "",
            "claim_date": "28.08.2020", "claim_id": "F00013731", "contract_date": ""
        },
        {
            "contract_id": "35163", "bank": "053", "summa": "510000000", "loan_summa": "0",
            "claim_date": "15.12.2020", "claim_id": "35163", "contract_date": "21.12.2020"
        }
    ])
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ML Feature Engineering Service");
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["POST /calculate-features"].is_string());
    assert!(body["endpoints"]["GET /health"].is_string());
}

#[tokio::test]
async fn test_calculate_features_structured() {
    let request = post_json(
        "/calculate-features",
        json!({
            "id": "test_123",
            "application_date": "2024-02-12T19:24:29.135000",
            "contracts": structured_contracts()
        }),
    );

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "test_123");
    assert_eq!(body["application_date"], "2024-02-12T19:24:29.135000");
    assert_eq!(body["tot_claim_cnt_l180d"], -3);
    assert_eq!(body["disb_bank_loan_wo_tbc"], 0.0);
    assert_eq!(body["day_sinlastloan"], 1148);
}

#[tokio::test]
async fn test_encoded_and_structured_contracts_agree() {
    let structured = post_json(
        "/calculate-features",
        json!({
            "id": "a",
            "application_date": "2024-02-12 19:24:29.135000+00:00",
            "contracts": structured_contracts()
        }),
    );
    let encoded = post_json(
        "/calculate-features-from-json",
        json!({
            "id": "a",
            "application_date": "2024-02-12 19:24:29.135000+00:00",
            "contracts": structured_contracts().to_string()
        }),
    );

    let (status_a, body_a) = send(app(), structured).await;
    let (status_b, body_b) = send(app(), encoded).await;
    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn test_empty_contracts_yield_sentinels() {
    for contracts in [json!([]), json!(""), json!("not json"), json!(null)] {
        let request = post_json(
            "/calculate-features-from-json",
            json!({
                "id": "edge_case",
                "application_date": "2024-02-12T19:24:29.135000",
                "contracts": contracts
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tot_claim_cnt_l180d"], -3);
        assert_eq!(body["disb_bank_loan_wo_tbc"], -1.0);
        assert_eq!(body["day_sinlastloan"], -1);
    }
}

#[tokio::test]
async fn test_numeric_id_from_tabular_row() {
    let request = post_json(
        "/calculate-features-from-json",
        json!({
            "id": 2925211,
            "application_date": "2024-02-12T19:24:29",
            "contracts": "[]"
        }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "2925211");
}

#[tokio::test]
async fn test_missing_application_date_is_rejected() {
    let request = post_json("/calculate-features-from-json", json!({"id": "x", "contracts": "[]"}));
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unparseable_application_date_is_rejected() {
    let request = post_json(
        "/calculate-features",
        json!({"application_date": "next tuesday", "contracts": []}),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("next tuesday"));
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/calculate-features")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "INVALID_CONTENT_TYPE");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_metrics_reflect_requests() {
    let app = app();
    let request = post_json(
        "/calculate-features",
        json!({"application_date": "2024-02-12T19:24:29", "contracts": []}),
    );
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(
        "bureau_features_requests_total{endpoint=\"calculate_features\",result=\"ok\"} 1"
    ));
}

#[tokio::test]
async fn test_metrics_can_be_disabled() {
    let config = ServerConfig {
        metrics_enabled: false,
        ..Default::default()
    };
    let app = create_router(AppState::new(config).unwrap());
    let (status, body) = send(app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
