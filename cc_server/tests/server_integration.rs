//! Integration tests for the HTTP API against the in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cc_server::api::{AppState, create_router};
use credit_casino::{
    CasinoConfig, Ledger, PromotionPolicy, WagerOrchestrator,
    db::MemoryAccountStore,
    games::SequenceRandom,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

/// Helper to create a test server with scripted outcome draws
fn create_test_server(config: CasinoConfig, draws: &[u32]) -> axum::Router {
    let config = CasinoConfig {
        reveal_delay_ms: 0,
        ..config
    };
    let ledger = Ledger::new(Arc::new(MemoryAccountStore::new()), config.starting_balance);
    let orchestrator = WagerOrchestrator::new(ledger, config)
        .with_random_source(SequenceRandom::new(draws.to_vec()));

    create_router(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn start_account(app: &axum::Router, account_id: i64) {
    let (status, _) = send(
        app,
        post_json(
            "/api/v1/accounts",
            json!({"account_id": account_id, "label": "tester"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server(CasinoConfig::default(), &[0]);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage"], true);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_server(CasinoConfig::default(), &[0]);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_start_creates_then_greets() {
    let app = create_test_server(CasinoConfig::default(), &[0]);

    let (status, body) = send(
        &app,
        post_json("/api/v1/accounts", json!({"account_id": 5, "label": "ann"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reply"]["type"], "started");
    assert_eq!(body["reply"]["balance"], 1000);
    assert_eq!(body["actions"][0]["label"], "🎰 Slots (10 credits)");
    assert_eq!(body["actions"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, post_json("/api/v1/accounts", json!({"account_id": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["created"], false);
}

#[tokio::test]
async fn test_balance_of_unknown_account_is_not_found() {
    let app = create_test_server(CasinoConfig::default(), &[0]);

    let (status, body) = send(&app, get("/api/v1/accounts/77/balance")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reply"]["type"], "rejected");
    assert_eq!(body["reply"]["error"], "unknown_account");
}

// ============================================================================
// Play Tests
// ============================================================================

#[tokio::test]
async fn test_play_roulette_zero() {
    let app = create_test_server(CasinoConfig::default(), &[0]);
    start_account(&app, 1).await;

    let (status, body) = send(&app, post("/api/v1/accounts/1/play/roulette")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["type"], "settled");
    assert_eq!(body["reply"]["payout"], 700);
    assert_eq!(body["reply"]["balance"], 1700);
    assert_eq!(body["frames"].as_array().unwrap().len(), 9);
    assert_eq!(body["frames"][8], "🎲 🟢 0");
    assert!(
        body["messages"][0]
            .as_str()
            .unwrap()
            .starts_with("🎉 You won 700 credits!")
    );

    let (_, body) = send(&app, get("/api/v1/accounts/1/balance")).await;
    assert_eq!(body["reply"]["credits"], 1700);
}

#[tokio::test]
async fn test_play_with_insufficient_funds() {
    let config = CasinoConfig {
        starting_balance: 5,
        ..CasinoConfig::default()
    };
    let app = create_test_server(config, &[0]);
    start_account(&app, 1).await;

    let (status, body) = send(&app, post("/api/v1/accounts/1/play/roulette")).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["reply"]["error"], "insufficient_funds");
    assert!(body["frames"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, get("/api/v1/accounts/1/balance")).await;
    assert_eq!(body["reply"]["credits"], 5);
}

#[tokio::test]
async fn test_unknown_game_is_bad_request() {
    let app = create_test_server(CasinoConfig::default(), &[0]);
    start_account(&app, 1).await;

    let response = app
        .clone()
        .oneshot(post("/api/v1/accounts/1/play/poker"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_promotion_and_cap_over_http() {
    let config = CasinoConfig {
        promotion: PromotionPolicy::Cap { max: 2 },
        ..CasinoConfig::default()
    };
    // Cherry, lemon, orange: every slots spin loses
    let app = create_test_server(config, &[0, 1, 2]);
    start_account(&app, 1).await;

    let (_, first) = send(&app, post("/api/v1/accounts/1/play/slots")).await;
    assert_eq!(first["reply"]["promotion"], false);
    assert_eq!(first["messages"].as_array().unwrap().len(), 1);

    let (_, second) = send(&app, post("/api/v1/accounts/1/play/slots")).await;
    assert_eq!(second["reply"]["promotion"], true);
    assert_eq!(second["messages"].as_array().unwrap().len(), 2);

    let (status, third) = send(&app, post("/api/v1/accounts/1/play/slots")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(third["reply"]["error"], "play_limit_reached");
}

#[tokio::test]
async fn test_history_lists_settled_wagers() {
    let app = create_test_server(CasinoConfig::default(), &[0, 1, 2]);
    start_account(&app, 1).await;

    for _ in 0..3 {
        send(&app, post("/api/v1/accounts/1/play/slots")).await;
    }

    let (status, body) = send(&app, get("/api/v1/accounts/1/history?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["delta"], -10);
    assert_eq!(entries[0]["balance_after"], 970);
    assert_eq!(entries[0]["game_type"], "slots");

    let (status, _) = send(&app, get("/api/v1/accounts/9/history")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
