//! Account store trait and its PostgreSQL implementation.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;

use crate::games::GameType;
use crate::ledger::{Account, AccountId, LedgerEntry, LedgerError, LedgerResult};

/// Storage contract required by the ledger
///
/// Every method is a single atomic unit: either it fully applies or it
/// leaves the store untouched.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an account by id
    async fn find_account(&self, id: AccountId) -> LedgerResult<Option<Account>>;

    /// Insert an account unless one already exists; returns whether it was created
    async fn insert_account(
        &self,
        id: AccountId,
        label: &str,
        starting_balance: i64,
    ) -> LedgerResult<bool>;

    /// Add `delta` to the balance, increment the game's counter and record a
    /// ledger entry under `idempotency_key`; returns the new balance
    async fn apply_payout(
        &self,
        id: AccountId,
        game: GameType,
        delta: i64,
        idempotency_key: &str,
    ) -> LedgerResult<i64>;

    /// Ledger entries for an account, newest first
    async fn entries(&self, id: AccountId, limit: i64) -> LedgerResult<Vec<LedgerEntry>>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> LedgerResult<()>;
}

/// PostgreSQL implementation of `AccountStore`
#[derive(Clone)]
pub struct PgAccountStore {
    pool: Arc<PgPool>,
}

impl PgAccountStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create the `accounts` and `ledger_entries` tables if they are missing
    pub async fn ensure_schema(&self) -> LedgerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                account_id BIGINT PRIMARY KEY,
                label TEXT NOT NULL,
                credits BIGINT NOT NULL,
                slots_played BIGINT NOT NULL DEFAULT 0,
                roulette_played BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_entries (
                id BIGSERIAL PRIMARY KEY,
                account_id BIGINT NOT NULL REFERENCES accounts (account_id),
                game_type TEXT NOT NULL,
                delta BIGINT NOT NULL,
                balance_after BIGINT NOT NULL,
                idempotency_key TEXT NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_ledger_entries_account
             ON ledger_entries (account_id, created_at DESC)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    fn account_from_row(row: &PgRow) -> Account {
        Account {
            id: row.get("account_id"),
            label: row.get("label"),
            credits: row.get("credits"),
            slots_played: row.get("slots_played"),
            roulette_played: row.get("roulette_played"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        }
    }

    fn entry_from_row(row: &PgRow) -> LedgerResult<LedgerEntry> {
        let game_type = decode_game_type(row.try_get("game_type")?)?;

        Ok(LedgerEntry {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            game_type,
            delta: row.try_get("delta")?,
            balance_after: row.try_get("balance_after")?,
            idempotency_key: row.try_get("idempotency_key")?,
            created_at: row
                .try_get::<chrono::NaiveDateTime, _>("created_at")?
                .and_utc(),
        })
    }
}

/// Parse a stored `game_type` column, failing on values no game writes
fn decode_game_type(raw: &str) -> LedgerResult<GameType> {
    raw.parse::<GameType>()
        .map_err(|e| LedgerError::Storage(sqlx::Error::Decode(e.into())))
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_account(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT account_id, label, credits, slots_played, roulette_played, created_at, updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.as_ref().map(Self::account_from_row))
    }

    async fn insert_account(
        &self,
        id: AccountId,
        label: &str,
        starting_balance: i64,
    ) -> LedgerResult<bool> {
        let result = sqlx::query(
            "INSERT INTO accounts (account_id, label, credits)
             VALUES ($1, $2, $3)
             ON CONFLICT (account_id) DO NOTHING",
        )
        .bind(id)
        .bind(label)
        .bind(starting_balance)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn apply_payout(
        &self,
        id: AccountId,
        game: GameType,
        delta: i64,
        idempotency_key: &str,
    ) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM ledger_entries WHERE idempotency_key = $1")
            .bind(idempotency_key)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(LedgerError::DuplicateSettlement(idempotency_key.to_string()));
        }

        // Row lock serializes concurrent payouts for the same account
        let row = sqlx::query("SELECT credits FROM accounts WHERE account_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LedgerError::UnknownAccount(id))?;

        let current: i64 = row.get("credits");
        let new_balance = current
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow)?;

        let update = match game {
            GameType::Slots => {
                "UPDATE accounts
                 SET credits = $1, slots_played = slots_played + 1, updated_at = NOW()
                 WHERE account_id = $2"
            }
            GameType::Roulette => {
                "UPDATE accounts
                 SET credits = $1, roulette_played = roulette_played + 1, updated_at = NOW()
                 WHERE account_id = $2"
            }
        };

        sqlx::query(update)
            .bind(new_balance)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO ledger_entries (account_id, game_type, delta, balance_after, idempotency_key)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(game.to_string())
        .bind(delta)
        .bind(new_balance)
        .bind(idempotency_key)
        .execute(&mut *tx)
        .await;

        // A concurrent commit may have claimed the key after our check
        if let Err(sqlx::Error::Database(ref db_err)) = inserted
            && db_err.is_unique_violation()
        {
            return Err(LedgerError::DuplicateSettlement(idempotency_key.to_string()));
        }
        inserted?;

        tx.commit().await?;

        Ok(new_balance)
    }

    async fn entries(&self, id: AccountId, limit: i64) -> LedgerResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, game_type, delta, balance_after, idempotency_key, created_at
            FROM ledger_entries
            WHERE account_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    async fn health_check(&self) -> LedgerResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_game_types() {
        assert_eq!(decode_game_type("slots").unwrap(), GameType::Slots);
        assert_eq!(decode_game_type("roulette").unwrap(), GameType::Roulette);
    }

    #[test]
    fn test_decode_unknown_game_type_is_storage_error() {
        let err = decode_game_type("blackjack").unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("blackjack"));
    }
}
