//! Prometheus metrics for the casino server.
//!
//! Metrics are exposed in Prometheus text format on a separate listener when
//! `METRICS_BIND` is set. Without an installed recorder every call here is a
//! no-op.

use credit_casino::{Reply, WagerError};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Record the reply to a play intent.
pub fn record_wager(reply: &Reply) {
    match reply {
        Reply::Settled(receipt) => {
            let result = if receipt.payout > 0 { "win" } else { "loss" };
            metrics::counter!("wagers_settled_total",
                "game" => receipt.game_type.to_string(),
                "result" => result
            )
            .increment(1);
            metrics::histogram!("wager_payout_credits",
                "game" => receipt.game_type.to_string()
            )
            .record(receipt.payout as f64);

            if !receipt.reveal.is_completed() {
                metrics::counter!("reveal_cancellations_total").increment(1);
            }
            if receipt.promotion {
                metrics::counter!("promotions_shown_total").increment(1);
            }
        }
        Reply::Rejected(err) => {
            metrics::counter!("wagers_rejected_total", "reason" => rejection_reason(err))
                .increment(1);
        }
        _ => {}
    }
}

fn rejection_reason(err: &WagerError) -> &'static str {
    match err {
        WagerError::UnknownAccount(_) => "unknown_account",
        WagerError::InsufficientFunds { .. } => "insufficient_funds",
        WagerError::PlayLimitReached { .. } => "play_limit",
        WagerError::StorageFailure(_) => "storage",
    }
}

/// Increment total WebSocket connections counter.
pub fn websocket_connections_total() {
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Record HTTP request.
pub fn http_requests_total(method: &str, route: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
