//! Account and play API handlers.
//!
//! Every handler turns the request into an [`Intent`], runs it through the
//! orchestrator with a [`RecordingPresenter`] and returns everything the
//! player would have seen in one JSON body.
//!
//! # Examples
//!
//! Start an account:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/accounts \
//!   -H "Content-Type: application/json" \
//!   -d '{"account_id": 42, "label": "alice"}'
//! ```
//!
//! Play roulette:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/accounts/42/play/roulette
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use credit_casino::{
    GameType, Intent, Reply, WagerError,
    ledger::{AccountId, LedgerEntry},
    reveal::RecordingPresenter,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{ActionItem, AppState, menu, request_id::RequestId};
use crate::{logging, metrics};

/// Label used when a start request doesn't name the player
const DEFAULT_LABEL: &str = "player";

/// Default and maximum number of history entries per request
const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub account_id: AccountId,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Everything produced by one intent
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub reply: Reply,
    /// Rendered reveal frames, in order
    pub frames: Vec<String>,
    /// Text messages (reply text, result, promotion), in order
    pub messages: Vec<String>,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP status for a reply
pub fn status_for(reply: &Reply) -> StatusCode {
    match reply {
        Reply::Started { created: true, .. } => StatusCode::CREATED,
        Reply::Started { .. } | Reply::Balance { .. } | Reply::Settled(_) => StatusCode::OK,
        Reply::Rejected(err) => match err {
            WagerError::UnknownAccount(_) => StatusCode::NOT_FOUND,
            WagerError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            WagerError::PlayLimitReached { .. } => StatusCode::FORBIDDEN,
            WagerError::StorageFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
    }
}

async fn run_intent(state: &AppState, intent: Intent) -> (StatusCode, Json<IntentResponse>) {
    let mut presenter = RecordingPresenter::new();
    let reply = state.orchestrator.handle(intent, &mut presenter).await;

    let response = IntentResponse {
        frames: presenter.frames.iter().map(|frame| frame.render()).collect(),
        messages: presenter.messages,
        actions: menu(state.orchestrator.config()),
        reply,
    };

    (status_for(&response.reply), Json(response))
}

/// Create an account, or greet a returning player.
///
/// Returns `201 Created` for a new account and `200 OK` otherwise; the
/// balance is never reset.
pub async fn start(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<StartRequest>,
) -> (StatusCode, Json<IntentResponse>) {
    tracing::debug!(
        request_id = request_id.as_str(),
        account_id = request.account_id,
        "Start requested"
    );

    let label = request
        .label
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LABEL.to_string());

    run_intent(
        &state,
        Intent::Start {
            account_id: request.account_id,
            label,
        },
    )
    .await
}

/// Current balance of an account.
pub async fn balance(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> (StatusCode, Json<IntentResponse>) {
    run_intent(&state, Intent::QueryBalance { account_id }).await
}

/// Ledger entries for an account, newest first.
///
/// # Errors
///
/// - `404 Not Found`: Unknown account
/// - `503 Service Unavailable`: Storage failure
pub async fn history(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<LedgerEntry>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let ledger = state.orchestrator.ledger();

    let result = async {
        ledger.get_account(account_id).await?;
        ledger.entries(account_id, limit).await
    }
    .await;

    result.map(Json).map_err(|e| {
        let err = WagerError::from(e);
        (
            status_for(&Reply::Rejected(err.clone())),
            Json(ErrorResponse {
                error: err.client_message(),
            }),
        )
    })
}

/// Play one round of a game.
///
/// The response carries the reveal frames, the result text and, when due,
/// the promotional message. Unknown game names are rejected with `400`.
pub async fn play(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((account_id, game)): Path<(AccountId, GameType)>,
) -> (StatusCode, Json<IntentResponse>) {
    let intent = match game {
        GameType::Slots => Intent::PlaySlots { account_id },
        GameType::Roulette => Intent::PlayRoulette { account_id },
    };

    let started = Instant::now();
    let (status, response) = run_intent(&state, intent).await;

    tracing::debug!(request_id = request_id.as_str(), status = %status, "Play handled");
    logging::log_wager("http", &response.reply);
    logging::log_performance("play", started.elapsed());
    metrics::record_wager(&response.reply);

    (status, response)
}
