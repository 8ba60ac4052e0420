//! Wager error types.

use crate::{
    games::GameType,
    ledger::{AccountId, LedgerError},
};
use serde::Serialize;
use thiserror::Error;

/// Reasons a wager is rejected or fails
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum WagerError {
    /// The account was never started
    #[error("Unknown account {0}")]
    UnknownAccount(AccountId),

    /// Stake exceeds the balance
    #[error("Insufficient credits: available {available}, required {required}")]
    InsufficientFunds { available: i64, required: i64 },

    /// Play cap reached for this game type
    #[error("Play limit of {limit} reached for {game}")]
    PlayLimitReached { game: GameType, limit: i64 },

    /// Storage failed; the wager was not settled
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl WagerError {
    /// Text shown to the player; never includes storage internals
    pub fn client_message(&self) -> String {
        match self {
            WagerError::UnknownAccount(_) => {
                "👋 You don't have an account yet. Send /start to get your credits.".to_string()
            }
            WagerError::InsufficientFunds { .. } => "❌ Not enough credits!".to_string(),
            WagerError::PlayLimitReached { limit, .. } => {
                format!("🚫 You've played the maximum of {limit} games.")
            }
            WagerError::StorageFailure(_) => {
                "⚠️ Something went wrong. Please try again later.".to_string()
            }
        }
    }
}

impl From<LedgerError> for WagerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownAccount(id) => WagerError::UnknownAccount(id),
            other => WagerError::StorageFailure(other.to_string()),
        }
    }
}

/// Result type for wager operations
pub type WagerResult<T> = Result<T, WagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_errors_map_to_wager_errors() {
        assert_eq!(
            WagerError::from(LedgerError::UnknownAccount(3)),
            WagerError::UnknownAccount(3)
        );
        assert!(matches!(
            WagerError::from(LedgerError::Storage(sqlx::Error::PoolClosed)),
            WagerError::StorageFailure(_)
        ));
    }

    #[test]
    fn test_storage_failure_message_is_generic() {
        let err = WagerError::StorageFailure("relation \"accounts\" does not exist".to_string());
        assert!(!err.client_message().contains("accounts"));
    }
}
