//! Per-account critical sections.

use crate::ledger::AccountId;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Registry of one async mutex per account
///
/// Wagers for the same account queue on its mutex; different accounts never
/// contend beyond the short registry lookup.
#[derive(Default)]
pub struct AccountLocks {
    locks: RwLock<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an account
    pub async fn acquire(&self, id: AccountId) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(&id).cloned();

        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                locks.entry(id).or_default().clone()
            }
        };

        lock.lock_owned().await
    }

    /// Number of accounts with a registered lock
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}
