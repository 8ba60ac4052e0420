//! Ledger error types.

use super::models::AccountId;
use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Account was never initialized
    #[error("Unknown account {0}")]
    UnknownAccount(AccountId),

    /// Payout already applied under this idempotency key
    #[error("Duplicate settlement: {0}")]
    DuplicateSettlement(String),

    /// Balance arithmetic overflowed
    #[error("Balance overflow")]
    BalanceOverflow,
}

impl LedgerError {
    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Storage(_) => "Internal server error".to_string(),
            LedgerError::UnknownAccount(_) => "Unknown account".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the error came from the storage backend
    pub fn is_storage(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
