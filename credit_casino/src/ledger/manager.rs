//! Ledger manager implementation on top of an account store.

use super::{
    errors::{LedgerError, LedgerResult},
    models::{Account, AccountId, LedgerEntry},
};
use crate::{db::AccountStore, games::GameType};
use std::sync::Arc;

/// Ledger manager
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn AccountStore>,
    starting_balance: i64,
}

impl Ledger {
    /// Create a new ledger
    ///
    /// # Arguments
    ///
    /// * `store` - Account storage backend
    /// * `starting_balance` - Credits granted to newly created accounts
    pub fn new(store: Arc<dyn AccountStore>, starting_balance: i64) -> Self {
        Self {
            store,
            starting_balance,
        }
    }

    /// Credits granted to newly created accounts
    pub fn starting_balance(&self) -> i64 {
        self.starting_balance
    }

    /// Get the full account record
    ///
    /// # Errors
    ///
    /// * `LedgerError::UnknownAccount` - No account with this id
    pub async fn get_account(&self, id: AccountId) -> LedgerResult<Account> {
        self.store
            .find_account(id)
            .await?
            .ok_or(LedgerError::UnknownAccount(id))
    }

    /// Whether an account has been started
    pub async fn account_exists(&self, id: AccountId) -> LedgerResult<bool> {
        Ok(self.store.find_account(id).await?.is_some())
    }

    /// Get the credit balance of an account
    ///
    /// # Errors
    ///
    /// * `LedgerError::UnknownAccount` - No account with this id
    pub async fn get_balance(&self, id: AccountId) -> LedgerResult<i64> {
        Ok(self.get_account(id).await?.credits)
    }

    /// Get the number of settled wagers of a game type
    pub async fn get_play_count(&self, id: AccountId, game: GameType) -> LedgerResult<i64> {
        Ok(self.get_account(id).await?.play_count(game))
    }

    /// Create the account if it doesn't exist yet
    ///
    /// # Returns
    ///
    /// * `LedgerResult<bool>` - `true` if a new record was created
    pub async fn ensure_account(&self, id: AccountId, label: &str) -> LedgerResult<bool> {
        let created = self
            .store
            .insert_account(id, label, self.starting_balance)
            .await?;

        if created {
            log::info!(
                "Created account {} ({}) with {} credits",
                id,
                label,
                self.starting_balance
            );
        }

        Ok(created)
    }

    /// Add `delta` to the balance and bump the play counter in one commit
    ///
    /// The balance is not checked for non-negativity here; the stake must
    /// already have been validated by the caller.
    ///
    /// # Arguments
    ///
    /// * `id` - Account ID
    /// * `game` - Game type whose counter is incremented
    /// * `delta` - Signed credit change
    /// * `idempotency_key` - Unique key of the settled wager
    ///
    /// # Returns
    ///
    /// * `LedgerResult<i64>` - New balance
    ///
    /// # Errors
    ///
    /// * `LedgerError::UnknownAccount` - No account with this id
    /// * `LedgerError::DuplicateSettlement` - Key already applied, nothing changed
    pub async fn apply_payout(
        &self,
        id: AccountId,
        game: GameType,
        delta: i64,
        idempotency_key: String,
    ) -> LedgerResult<i64> {
        let new_balance = self
            .store
            .apply_payout(id, game, delta, &idempotency_key)
            .await?;

        log::debug!(
            "Applied {:+} to account {} for {} ({}), balance now {}",
            delta,
            id,
            game,
            idempotency_key,
            new_balance
        );

        Ok(new_balance)
    }

    /// Get ledger entries for an account, newest first
    pub async fn entries(&self, id: AccountId, limit: i64) -> LedgerResult<Vec<LedgerEntry>> {
        self.store.entries(id, limit).await
    }

    /// Check that the storage backend is reachable
    pub async fn health_check(&self) -> LedgerResult<()> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryAccountStore;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(MemoryAccountStore::new()), 1000)
    }

    #[tokio::test]
    async fn test_ensure_account_is_idempotent() {
        let ledger = ledger();
        assert!(!ledger.account_exists(7).await.unwrap());
        assert!(ledger.ensure_account(7, "bob").await.unwrap());
        assert!(ledger.account_exists(7).await.unwrap());
        assert!(!ledger.ensure_account(7, "bob").await.unwrap());
        assert_eq!(ledger.get_balance(7).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_get_balance_unknown_account() {
        let err = ledger().get_balance(99).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(99)));
    }

    #[tokio::test]
    async fn test_apply_payout_updates_balance_and_counter() {
        let ledger = ledger();
        ledger.ensure_account(1, "a").await.unwrap();

        let balance = ledger
            .apply_payout(1, GameType::Roulette, -20, "k1".to_string())
            .await
            .unwrap();

        assert_eq!(balance, 980);
        assert_eq!(ledger.get_play_count(1, GameType::Roulette).await.unwrap(), 1);
        assert_eq!(ledger.get_play_count(1, GameType::Slots).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_apply_payout_does_not_enforce_non_negative() {
        let ledger = ledger();
        ledger.ensure_account(1, "a").await.unwrap();

        let balance = ledger
            .apply_payout(1, GameType::Slots, -1500, "k1".to_string())
            .await
            .unwrap();

        assert_eq!(balance, -500);
    }

    #[tokio::test]
    async fn test_apply_payout_unknown_account() {
        let err = ledger()
            .apply_payout(5, GameType::Slots, 10, "k".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(5)));
    }
}
