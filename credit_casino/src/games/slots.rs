//! Three-reel slot matcher.

use super::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed payout when all three reels match
pub const JACKPOT_PAYOUT: i64 = 50;

/// Fixed payout for one adjacent matching pair
pub const PAIR_PAYOUT: i64 = 20;

/// Number of reels in a spin
pub const REEL_COUNT: usize = 3;

/// Reel symbol alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Grapes,
    Bell,
    Seven,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Grapes,
        Symbol::Bell,
        Symbol::Seven,
    ];

    /// Draw one symbol uniformly
    pub fn draw(rng: &mut impl RandomSource) -> Self {
        Self::ALL[rng.next_below(Self::ALL.len() as u32) as usize]
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Grapes => "🍇",
            Symbol::Bell => "🔔",
            Symbol::Seven => "7️⃣",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Classification of a spin, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCombination {
    Triple,
    AdjacentPair,
    NoMatch,
}

/// One slot spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpin {
    pub reels: [Symbol; REEL_COUNT],
}

impl SlotSpin {
    pub fn new(reels: [Symbol; REEL_COUNT]) -> Self {
        Self { reels }
    }

    /// Draw three independent reels
    pub fn draw(rng: &mut impl RandomSource) -> Self {
        let first = Symbol::draw(rng);
        let second = Symbol::draw(rng);
        let third = Symbol::draw(rng);
        Self::new([first, second, third])
    }

    pub fn combination(&self) -> SlotCombination {
        let [a, b, c] = self.reels;
        if a == b && b == c {
            SlotCombination::Triple
        } else if a == b || b == c {
            SlotCombination::AdjacentPair
        } else {
            SlotCombination::NoMatch
        }
    }

    /// Net credit change for this spin
    pub fn payout(&self, stake: i64) -> i64 {
        match self.combination() {
            SlotCombination::Triple => JACKPOT_PAYOUT,
            SlotCombination::AdjacentPair => PAIR_PAYOUT,
            SlotCombination::NoMatch => -stake,
        }
    }
}

impl fmt::Display for SlotSpin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.reels;
        write!(f, "{a} | {b} | {c}")
    }
}
