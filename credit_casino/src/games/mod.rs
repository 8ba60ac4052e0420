//! Outcome engine: stateless games of chance.
//!
//! Each game maps draws from a caller-supplied [`RandomSource`] to an
//! immutable [`Outcome`], and every outcome maps to exactly one signed payout.
//!
//! - [`slots`]: three reels over a six-symbol alphabet
//! - [`roulette`]: single-zero wheel, colour-only bet

pub mod rng;
pub mod roulette;
pub mod slots;

pub use rng::{RandomSource, SequenceRandom, SystemRandom};
pub use roulette::{Color, RouletteSpin};
pub use slots::{SlotCombination, SlotSpin, Symbol};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Supported games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Slots,
    Roulette,
}

impl GameType {
    pub const ALL: [GameType; 2] = [GameType::Slots, GameType::Roulette];
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Slots => write!(f, "slots"),
            GameType::Roulette => write!(f, "roulette"),
        }
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slots" => Ok(GameType::Slots),
            "roulette" => Ok(GameType::Roulette),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// Game-specific result of one play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Outcome {
    Slots(SlotSpin),
    Roulette(RouletteSpin),
}

impl Outcome {
    /// Draw a fresh outcome for a game
    pub fn draw(game: GameType, rng: &mut impl RandomSource) -> Self {
        match game {
            GameType::Slots => Outcome::Slots(SlotSpin::draw(rng)),
            GameType::Roulette => Outcome::Roulette(RouletteSpin::draw(rng)),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Outcome::Slots(_) => GameType::Slots,
            Outcome::Roulette(_) => GameType::Roulette,
        }
    }

    /// Net credit change for this outcome at the given stake
    pub fn payout(&self, stake: i64) -> i64 {
        match self {
            Outcome::Slots(spin) => spin.payout(stake),
            Outcome::Roulette(spin) => spin.payout(stake),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Slots(spin) => write!(f, "{spin}"),
            Outcome::Roulette(spin) => write!(f, "{spin}"),
        }
    }
}

/// Outcome together with its payout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: Outcome,
    pub payout: i64,
}

/// Resolve one play of `game` at `stake`
pub fn resolve(game: GameType, stake: i64, rng: &mut impl RandomSource) -> Resolution {
    let outcome = Outcome::draw(game, rng);
    Resolution {
        outcome,
        payout: outcome.payout(stake),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_type_round_trips_through_str() {
        for game in GameType::ALL {
            assert_eq!(game.to_string().parse::<GameType>().unwrap(), game);
        }
        assert!("poker".parse::<GameType>().is_err());
    }

    #[test]
    fn test_resolve_slots_triple() {
        let mut rng = SequenceRandom::new(vec![5, 5, 5]);
        let resolution = resolve(GameType::Slots, 10, &mut rng);
        assert_eq!(resolution.outcome.game_type(), GameType::Slots);
        assert_eq!(resolution.payout, 50);
    }

    #[test]
    fn test_resolve_roulette_zero() {
        let mut rng = SequenceRandom::new(vec![0]);
        let resolution = resolve(GameType::Roulette, 20, &mut rng);
        assert_eq!(resolution.payout, 700);
        assert_eq!(resolution.outcome.to_string(), "🟢 0");
    }
}
