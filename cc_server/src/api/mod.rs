//! HTTP/WebSocket API for the casino server.
//!
//! # Modules
//!
//! - [`accounts`]: account start, balance, history and plays over REST
//! - [`websocket`]: live play with frames pushed as they are revealed
//! - [`request_id`]: request correlation and HTTP metrics
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                                    - Storage health
//! POST /api/v1/accounts                           - Start (create or greet)
//! GET  /api/v1/accounts/{account_id}/balance      - Current balance
//! GET  /api/v1/accounts/{account_id}/history      - Ledger entries, newest first
//! POST /api/v1/accounts/{account_id}/play/{game}  - Play slots or roulette
//! GET  /ws/{account_id}                           - WebSocket session
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod accounts;
pub mod request_id;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use credit_casino::{
    CasinoConfig, WagerOrchestrator,
    casino::MenuAction,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<WagerOrchestrator>,
}

/// Menu entry sent with every reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub action: MenuAction,
    pub label: String,
}

/// The player menu, labelled with the configured stakes
pub fn menu(config: &CasinoConfig) -> Vec<ActionItem> {
    MenuAction::ALL
        .iter()
        .map(|action| ActionItem {
            action: *action,
            label: action.label(config),
        })
        .collect()
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use cc_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/accounts", post(accounts::start))
        .route("/accounts/{account_id}/balance", get(accounts::balance))
        .route("/accounts/{account_id}/history", get(accounts::history))
        .route("/accounts/{account_id}/play/{game}", post(accounts::play));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws/{account_id}", get(websocket::websocket_handler))
        .nest("/api/v1", v1_routes)
        .route_layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the account store answers, `503 Service Unavailable`
/// otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage_healthy = match state.orchestrator.ledger().health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Storage health check failed: {}", e);
            false
        }
    };

    let status_code = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if storage_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
