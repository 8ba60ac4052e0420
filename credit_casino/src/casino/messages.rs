//! Messages exchanged between transports and the orchestrator.

use super::{config::CasinoConfig, errors::WagerError};
use crate::{
    games::{GameType, Outcome, Resolution},
    ledger::AccountId,
    reveal::RevealStatus,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player command, already parsed by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Start { account_id: AccountId, label: String },
    PlaySlots { account_id: AccountId },
    PlayRoulette { account_id: AccountId },
    QueryBalance { account_id: AccountId },
}

impl Intent {
    pub fn account_id(&self) -> AccountId {
        match self {
            Intent::Start { account_id, .. }
            | Intent::PlaySlots { account_id }
            | Intent::PlayRoulette { account_id }
            | Intent::QueryBalance { account_id } => *account_id,
        }
    }
}

/// Actions offered on the persistent player menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    PlaySlots,
    PlayRoulette,
    Balance,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [
        MenuAction::PlaySlots,
        MenuAction::PlayRoulette,
        MenuAction::Balance,
    ];

    /// Button label, with the configured stake where relevant
    pub fn label(&self, config: &CasinoConfig) -> String {
        match self {
            MenuAction::PlaySlots => format!("🎰 Slots ({} credits)", config.slots_stake),
            MenuAction::PlayRoulette => {
                format!("🎲 Roulette ({} credits)", config.roulette_stake)
            }
            MenuAction::Balance => "💰 My balance".to_string(),
        }
    }

    /// Intent this action produces for an account
    pub fn intent(&self, account_id: AccountId) -> Intent {
        match self {
            MenuAction::PlaySlots => Intent::PlaySlots { account_id },
            MenuAction::PlayRoulette => Intent::PlayRoulette { account_id },
            MenuAction::Balance => Intent::QueryBalance { account_id },
        }
    }
}

/// Lifecycle of a single wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WagerPhase {
    Requested,
    Validated,
    Resolved,
    Settled,
    Rejected,
}

impl WagerPhase {
    /// Whether `next` directly follows this phase
    pub fn can_advance_to(self, next: WagerPhase) -> bool {
        matches!(
            (self, next),
            (WagerPhase::Requested, WagerPhase::Validated)
                | (WagerPhase::Requested, WagerPhase::Rejected)
                | (WagerPhase::Validated, WagerPhase::Resolved)
                | (WagerPhase::Validated, WagerPhase::Rejected)
                | (WagerPhase::Resolved, WagerPhase::Settled)
                | (WagerPhase::Resolved, WagerPhase::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WagerPhase::Settled | WagerPhase::Rejected)
    }
}

/// One play request moving through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wager {
    pub id: Uuid,
    pub account_id: AccountId,
    pub game_type: GameType,
    pub stake: i64,
    phase: WagerPhase,
    resolution: Option<Resolution>,
}

impl Wager {
    pub fn request(account_id: AccountId, game_type: GameType, stake: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            game_type,
            stake,
            phase: WagerPhase::Requested,
            resolution: None,
        }
    }

    pub fn phase(&self) -> WagerPhase {
        self.phase
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Key under which the payout is recorded in the ledger
    pub fn idempotency_key(&self) -> String {
        format!("wager_{}", self.id)
    }

    pub fn validate(&mut self) {
        self.advance(WagerPhase::Validated);
    }

    pub fn resolve(&mut self, resolution: Resolution) {
        self.advance(WagerPhase::Resolved);
        self.resolution = Some(resolution);
    }

    pub fn settle(&mut self) {
        self.advance(WagerPhase::Settled);
    }

    /// Abandon the wager; any computed resolution is discarded
    pub fn reject(&mut self) {
        self.advance(WagerPhase::Rejected);
        self.resolution = None;
    }

    fn advance(&mut self, next: WagerPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid wager transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }
}

/// Record of a settled wager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WagerReceipt {
    pub wager_id: Uuid,
    pub account_id: AccountId,
    pub game_type: GameType,
    pub stake: i64,
    pub outcome: Outcome,
    pub payout: i64,
    /// Balance after settlement
    pub balance: i64,
    /// Play count for this game type after settlement
    pub plays: i64,
    /// Whether the promotional interstitial fired
    pub promotion: bool,
    pub reveal: RevealStatus,
}

impl WagerReceipt {
    /// Result message shown after the reveal
    pub fn result_text(&self) -> String {
        let headline = if self.payout > 0 {
            format!("🎉 You won {} credits!", self.payout)
        } else {
            format!("😢 You lost {} credits", self.payout.unsigned_abs())
        };

        match self.outcome {
            Outcome::Slots(_) => format!("{headline}\n💎 Combination: {}", self.outcome),
            Outcome::Roulette(_) => format!("{headline}\n🎲 Result: {}", self.outcome),
        }
    }
}

/// Orchestrator response to an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// Account ready; `created` is false for a returning player
    Started { created: bool, balance: i64 },
    Balance { credits: i64 },
    Settled(WagerReceipt),
    Rejected(WagerError),
}

impl Reply {
    /// Player-facing text for this reply
    pub fn text(&self) -> String {
        match self {
            Reply::Started {
                created: true,
                balance,
            } => format!("🎰 Welcome to the casino! You've been granted {balance} credits."),
            Reply::Started {
                created: false,
                balance,
            } => format!("🔄 Welcome back! You have {balance} credits."),
            Reply::Balance { credits } => format!("💰 Your balance: {credits} credits"),
            Reply::Settled(receipt) => receipt.result_text(),
            Reply::Rejected(err) => err.client_message(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Reply::Rejected(_))
    }
}
