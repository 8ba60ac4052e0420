//! Ledger data models.

use crate::games::GameType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque account identifier supplied by the transport (chat user id)
pub type AccountId = i64;

/// Credits granted when an account is first created
pub const DEFAULT_STARTING_BALANCE: i64 = 1000;

/// Account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub label: String,
    pub credits: i64,
    pub slots_played: i64,
    pub roulette_played: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh account with zeroed counters
    pub fn new(id: AccountId, label: impl Into<String>, credits: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            label: label.into(),
            credits,
            slots_played: 0,
            roulette_played: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of settled wagers for a game type
    pub fn play_count(&self, game: GameType) -> i64 {
        match game {
            GameType::Slots => self.slots_played,
            GameType::Roulette => self.roulette_played,
        }
    }

    /// Mutable counter for a game type
    pub(crate) fn play_count_mut(&mut self, game: GameType) -> &mut i64 {
        match game {
            GameType::Slots => &mut self.slots_played,
            GameType::Roulette => &mut self.roulette_played,
        }
    }
}

/// One applied payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub account_id: AccountId,
    pub game_type: GameType,
    pub delta: i64,
    pub balance_after: i64,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_zero_counters() {
        let account = Account::new(1, "alice", DEFAULT_STARTING_BALANCE);
        assert_eq!(account.credits, 1000);
        assert_eq!(account.play_count(GameType::Slots), 0);
        assert_eq!(account.play_count(GameType::Roulette), 0);
    }

    #[test]
    fn test_counters_are_per_game() {
        let mut account = Account::new(1, "alice", 1000);
        *account.play_count_mut(GameType::Roulette) += 3;
        assert_eq!(account.play_count(GameType::Roulette), 3);
        assert_eq!(account.play_count(GameType::Slots), 0);
    }
}
