//! # Credit Casino
//!
//! Engine for chat-driven games of chance played with virtual credits.
//!
//! A transport (chat bot, WebSocket, HTTP) parses player input into an
//! [`Intent`] and hands it to the [`WagerOrchestrator`], together with a
//! [`Presenter`] that delivers frames and messages back to the player.
//!
//! ## Core Modules
//!
//! - [`games`]: slots and roulette outcome engine
//! - [`ledger`]: balances, play counters and idempotent settlement
//! - [`reveal`]: teaser/final frame sequences and paced playback
//! - [`casino`]: wager lifecycle and orchestration
//! - [`db`]: PostgreSQL and in-memory account stores
//!
//! ## Example
//!
//! ```
//! use credit_casino::{
//!     CasinoConfig, Intent, Ledger, RecordingPresenter, Reply, WagerOrchestrator,
//!     db::MemoryAccountStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CasinoConfig {
//!         reveal_delay_ms: 0,
//!         ..CasinoConfig::default()
//!     };
//!     let ledger = Ledger::new(Arc::new(MemoryAccountStore::new()), config.starting_balance);
//!     let casino = WagerOrchestrator::new(ledger, config);
//!
//!     let mut presenter = RecordingPresenter::new();
//!     casino
//!         .handle(Intent::Start { account_id: 1, label: "alice".into() }, &mut presenter)
//!         .await;
//!     let reply = casino
//!         .handle(Intent::PlaySlots { account_id: 1 }, &mut presenter)
//!         .await;
//!
//!     assert!(matches!(reply, Reply::Settled(_)));
//! }
//! ```

/// Wager lifecycle and orchestration.
pub mod casino;
pub use casino::{CasinoConfig, Intent, PromotionPolicy, Reply, WagerError, WagerOrchestrator};

/// Account storage backends.
pub mod db;

/// Games of chance.
pub mod games;
pub use games::{GameType, Outcome};

/// Credit ledger.
pub mod ledger;
pub use ledger::{AccountId, Ledger, LedgerError};

/// Reveal sequencing and presentation.
pub mod reveal;
pub use reveal::{Frame, Presenter, RecordingPresenter, RevealSequence};
