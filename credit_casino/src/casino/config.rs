//! Casino configuration models.

use crate::{
    games::{GameType, roulette},
    ledger::DEFAULT_STARTING_BALANCE,
    reveal::DEFAULT_TEASER_FRAMES,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default promotional interstitial text
pub const DEFAULT_PROMOTION_MESSAGE: &str =
    "🔥 You're on a roll today! Switch to the full version to cash out your winnings.";

/// When the promotional interstitial is shown
///
/// Serialized as `{"trigger":"periodic","every":6}` or `{"trigger":"cap","max":5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "lowercase")]
pub enum PromotionPolicy {
    /// Show the promotion every `every` settled plays, play continues
    Periodic { every: u32 },
    /// Show the promotion when `max` plays are reached, then refuse further play
    Cap { max: u32 },
}

impl PromotionPolicy {
    fn threshold(&self) -> i64 {
        match self {
            PromotionPolicy::Periodic { every } => i64::from(*every),
            PromotionPolicy::Cap { max } => i64::from(*max),
        }
    }

    /// Whether the promotion fires for a post-settlement play count
    pub fn is_due(&self, plays: i64) -> bool {
        let threshold = self.threshold();
        threshold > 0 && plays > 0 && plays % threshold == 0
    }

    /// Whether a new wager is refused at the current play count
    pub fn blocks(&self, plays: i64) -> bool {
        match self {
            PromotionPolicy::Periodic { .. } => false,
            PromotionPolicy::Cap { max } => plays >= i64::from(*max),
        }
    }

    /// Play limit, if the policy has one
    pub fn limit(&self) -> Option<i64> {
        match self {
            PromotionPolicy::Periodic { .. } => None,
            PromotionPolicy::Cap { max } => Some(i64::from(*max)),
        }
    }
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        PromotionPolicy::Periodic { every: 6 }
    }
}

/// Casino configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasinoConfig {
    /// Credits granted to new accounts
    pub starting_balance: i64,

    /// Stake for one slots play
    pub slots_stake: i64,

    /// Stake for one roulette play
    pub roulette_stake: i64,

    /// Teaser frames before the final frame
    pub reveal_steps: usize,

    /// Delay between frames in milliseconds
    pub reveal_delay_ms: u64,

    /// Promotional interstitial trigger
    pub promotion: PromotionPolicy,

    /// Promotional interstitial text
    pub promotion_message: String,
}

impl Default for CasinoConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            slots_stake: 10,
            roulette_stake: 20,
            reveal_steps: DEFAULT_TEASER_FRAMES,
            reveal_delay_ms: 200,
            promotion: PromotionPolicy::default(),
            promotion_message: DEFAULT_PROMOTION_MESSAGE.to_string(),
        }
    }
}

impl CasinoConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `STARTING_BALANCE`, `SLOTS_STAKE`, `ROULETTE_STAKE`,
    /// `REVEAL_STEPS`, `REVEAL_DELAY_MS`, `PROMOTION_POLICY` (JSON) and
    /// `PROMOTION_MESSAGE`. Missing values keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `PROMOTION_POLICY` is set but isn't a valid policy
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let promotion = match std::env::var("PROMOTION_POLICY") {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| format!("PROMOTION_POLICY is not a valid policy: {e}"))?,
            Err(_) => defaults.promotion,
        };

        Ok(Self {
            starting_balance: parse_env_or("STARTING_BALANCE", defaults.starting_balance),
            slots_stake: parse_env_or("SLOTS_STAKE", defaults.slots_stake),
            roulette_stake: parse_env_or("ROULETTE_STAKE", defaults.roulette_stake),
            reveal_steps: parse_env_or("REVEAL_STEPS", defaults.reveal_steps),
            reveal_delay_ms: parse_env_or("REVEAL_DELAY_MS", defaults.reveal_delay_ms),
            promotion,
            promotion_message: std::env::var("PROMOTION_MESSAGE")
                .unwrap_or(defaults.promotion_message),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_balance < 0 {
            return Err("Starting balance must not be negative".to_string());
        }

        if self.slots_stake <= 0 || self.roulette_stake <= 0 {
            return Err("Stakes must be positive".to_string());
        }

        if self.roulette_stake > roulette::MAX_STAKE {
            return Err(format!(
                "Roulette stake must not exceed {}",
                roulette::MAX_STAKE
            ));
        }

        match self.promotion {
            PromotionPolicy::Periodic { every: 0 } => {
                Err("Periodic promotion interval must be at least 1".to_string())
            }
            PromotionPolicy::Cap { max: 0 } => Err("Play cap must be at least 1".to_string()),
            _ => Ok(()),
        }
    }

    /// Fixed stake for a game type
    pub fn stake(&self, game: GameType) -> i64 {
        match game {
            GameType::Slots => self.slots_stake,
            GameType::Roulette => self.roulette_stake,
        }
    }

    /// Delay between reveal frames
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
