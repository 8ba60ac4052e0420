//! Single-zero roulette wheel with a colour-only bet.

use super::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pockets on the wheel, numbered 0..=36
pub const POCKETS: u8 = 37;

/// Multiplier applied to the stake when the ball lands on zero
pub const ZERO_MULTIPLIER: i64 = 35;

/// Largest stake whose best payout still fits in an `i64`
pub const MAX_STAKE: i64 = i64::MAX / ZERO_MULTIPLIER;

/// Red numbers on a standard wheel.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Pocket colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl Color {
    /// Colour of a pocket; 0 is green
    pub fn of(number: u8) -> Self {
        if number == 0 {
            Color::Green
        } else if RED_NUMBERS.contains(&number) {
            Color::Red
        } else {
            Color::Black
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Color::Green => "🟢",
            Color::Red => "🔴",
            Color::Black => "⚫",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// One roulette spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteSpin {
    pub number: u8,
    pub color: Color,
}

impl RouletteSpin {
    /// Spin for a known pocket; numbers above 36 wrap around the wheel
    pub fn new(number: u8) -> Self {
        let number = number % POCKETS;
        Self {
            number,
            color: Color::of(number),
        }
    }

    pub fn draw(rng: &mut impl RandomSource) -> Self {
        Self::new(rng.next_below(POCKETS as u32) as u8)
    }

    /// Net credit change for this spin
    ///
    /// Zero pays 35x the stake, red pays 1.5x (rounded down), black loses the stake.
    /// Stakes above [`MAX_STAKE`] overflow; `CasinoConfig::validate` refuses them.
    pub fn payout(&self, stake: i64) -> i64 {
        match self.color {
            Color::Green => stake * ZERO_MULTIPLIER,
            Color::Red => stake * 3 / 2,
            Color::Black => -stake,
        }
    }
}

impl fmt::Display for RouletteSpin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.number)
    }
}
