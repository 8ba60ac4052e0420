//! Structured logging configuration.
//!
//! The subscriber also receives `log` records, so events emitted by the
//! `credit_casino` library show up alongside the server's own spans.

use credit_casino::{Reply, casino::WagerReceipt};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Operations slower than this are logged at warn level
const SLOW_OPERATION: Duration = Duration::from_secs(1);

/// Initialize structured logging
///
/// Log levels come from `RUST_LOG`, defaulting to `info,sqlx=warn,hyper=warn`.
///
/// # Example
///
/// ```no_run
/// use cc_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the outcome of a wager request with structured fields
///
/// # Arguments
///
/// * `transport` - Where the request came from (`http`, `ws`)
/// * `reply` - Orchestrator reply for a play intent
pub fn log_wager(transport: &str, reply: &Reply) {
    match reply {
        Reply::Settled(receipt) => log_wager_settled(transport, receipt),
        Reply::Rejected(err) => {
            tracing::info!(transport = transport, reason = %err, "Wager rejected");
        }
        _ => {}
    }
}

fn log_wager_settled(transport: &str, receipt: &WagerReceipt) {
    tracing::info!(
        transport = transport,
        wager_id = %receipt.wager_id,
        account_id = receipt.account_id,
        game = %receipt.game_type,
        payout = receipt.payout,
        balance = receipt.balance,
        plays = receipt.plays,
        promotion = receipt.promotion,
        "Wager settled"
    );

    if !receipt.reveal.is_completed() {
        tracing::debug!(
            wager_id = %receipt.wager_id,
            "Reveal cancelled before the final frame"
        );
    }
}

/// Log the duration of an operation, warning when it is slow
pub fn log_performance(operation: &str, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;
    if elapsed > SLOW_OPERATION {
        tracing::warn!(
            operation = operation,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow operation"
        );
    } else {
        tracing::debug!(
            operation = operation,
            duration_ms = duration_ms,
            "Performance metric"
        );
    }
}
