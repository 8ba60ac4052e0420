//! Ledger module owning every credit balance mutation.
//!
//! This module implements:
//! - Account records with per-game play counters
//! - Idempotent payout application (one ledger entry per settled wager)
//! - Atomic "add delta and bump counter" commits through an [`AccountStore`]
//! - Newest-first ledger history for auditing balances
//!
//! The ledger never checks for sufficient funds itself. Callers validate the
//! stake before committing a payout.
//!
//! ## Example
//!
//! ```
//! use credit_casino::db::MemoryAccountStore;
//! use credit_casino::games::GameType;
//! use credit_casino::ledger::Ledger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = Ledger::new(Arc::new(MemoryAccountStore::new()), 1000);
//!
//!     ledger.ensure_account(42, "alice").await?;
//!     let balance = ledger
//!         .apply_payout(42, GameType::Slots, 20, "wager_example".to_string())
//!         .await?;
//!     assert_eq!(balance, 1020);
//!
//!     Ok(())
//! }
//! ```
//!
//! [`AccountStore`]: crate::db::AccountStore

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{LedgerError, LedgerResult};
pub use manager::Ledger;
pub use models::{Account, AccountId, DEFAULT_STARTING_BALANCE, LedgerEntry};
