//! In-memory account store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use super::repository::AccountStore;
use crate::games::GameType;
use crate::ledger::{Account, AccountId, LedgerEntry, LedgerError, LedgerResult};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<AccountId, Account>,
    entries: Vec<LedgerEntry>,
    applied_keys: HashSet<String>,
}

/// Account store kept in process memory
///
/// Each operation runs under a single mutex, so payouts are linearizable.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryAccountStore {
    state: Mutex<MemoryState>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_account(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        Ok(self.state.lock().await.accounts.get(&id).cloned())
    }

    async fn insert_account(
        &self,
        id: AccountId,
        label: &str,
        starting_balance: i64,
    ) -> LedgerResult<bool> {
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&id) {
            return Ok(false);
        }
        state
            .accounts
            .insert(id, Account::new(id, label, starting_balance));
        Ok(true)
    }

    async fn apply_payout(
        &self,
        id: AccountId,
        game: GameType,
        delta: i64,
        idempotency_key: &str,
    ) -> LedgerResult<i64> {
        let mut state = self.state.lock().await;

        if state.applied_keys.contains(idempotency_key) {
            return Err(LedgerError::DuplicateSettlement(idempotency_key.to_string()));
        }

        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::UnknownAccount(id))?;

        let new_balance = account
            .credits
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow)?;

        let now = Utc::now();
        account.credits = new_balance;
        *account.play_count_mut(game) += 1;
        account.updated_at = now;

        let entry_id = state.entries.len() as i64 + 1;
        let entry = LedgerEntry {
            id: entry_id,
            account_id: id,
            game_type: game,
            delta,
            balance_after: new_balance,
            idempotency_key: idempotency_key.to_string(),
            created_at: now,
        };
        state.entries.push(entry);
        state.applied_keys.insert(idempotency_key.to_string());

        Ok(new_balance)
    }

    async fn entries(&self, id: AccountId, limit: i64) -> LedgerResult<Vec<LedgerEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.account_id == id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> LedgerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_key_leaves_state_untouched() {
        let store = MemoryAccountStore::new();
        store.insert_account(1, "a", 100).await.unwrap();
        store
            .apply_payout(1, GameType::Slots, 20, "wager_1")
            .await
            .unwrap();

        let err = store
            .apply_payout(1, GameType::Slots, 20, "wager_1")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSettlement(_)));

        let account = store.find_account(1).await.unwrap().unwrap();
        assert_eq!(account.credits, 120);
        assert_eq!(account.slots_played, 1);
        assert_eq!(store.entries(1, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_entries_newest_first_and_limited() {
        let store = MemoryAccountStore::new();
        store.insert_account(1, "a", 100).await.unwrap();
        store.insert_account(2, "b", 100).await.unwrap();
        for (i, delta) in [-10, 20, 50].into_iter().enumerate() {
            store
                .apply_payout(1, GameType::Slots, delta, &format!("k{i}"))
                .await
                .unwrap();
        }
        store
            .apply_payout(2, GameType::Roulette, -20, "other")
            .await
            .unwrap();

        let entries = store.entries(1, 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].delta, 50);
        assert_eq!(entries[0].balance_after, 160);
        assert_eq!(entries[1].delta, 20);
    }

    #[tokio::test]
    async fn test_overflow_is_rejected() {
        let store = MemoryAccountStore::new();
        store.insert_account(1, "a", i64::MAX).await.unwrap();
        let err = store
            .apply_payout(1, GameType::Slots, 1, "k")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BalanceOverflow));
    }
}
