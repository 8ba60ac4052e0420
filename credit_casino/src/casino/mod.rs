//! Wager orchestration for chat casino games.
//!
//! [`WagerOrchestrator`] turns player [`Intent`]s into [`Reply`]s. For a
//! play it:
//!
//! 1. Takes the per-account lock
//! 2. Validates the stake against the balance (and the play cap, if any)
//! 3. Resolves the outcome and commits the payout to the ledger
//! 4. Releases the lock and reveals the outcome frame by frame
//! 5. Sends the result text and, when due, the promotional interstitial

pub mod config;
pub mod errors;
pub mod locks;
pub mod messages;
pub mod orchestrator;

pub use config::{CasinoConfig, DEFAULT_PROMOTION_MESSAGE, PromotionPolicy};
pub use errors::{WagerError, WagerResult};
pub use locks::AccountLocks;
pub use messages::{Intent, MenuAction, Reply, Wager, WagerPhase, WagerReceipt};
pub use orchestrator::WagerOrchestrator;
