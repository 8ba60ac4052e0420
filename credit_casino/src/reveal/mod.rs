//! Reveal sequencer: paced presentation of an already-resolved outcome.
//!
//! A [`RevealSequence`] is a lazy, finite iterator yielding a fixed number
//! of cosmetic teaser frames followed by exactly one final frame carrying the
//! authoritative outcome. It is consumed by value and can't be restarted.
//!
//! [`play`] drives a sequence against a [`Presenter`] with a fixed delay
//! between frames and stops at the first delivery failure. Presentation never
//! feeds back into settlement.

pub mod playback;

pub use playback::{PresentationError, Presenter, RecordingPresenter, RevealStatus, play};

use crate::games::{GameType, Outcome, RandomSource};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Teaser frames shown before the final frame
pub const DEFAULT_TEASER_FRAMES: usize = 8;

/// One presentation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "outcome", rename_all = "lowercase")]
pub enum Frame {
    /// Cosmetic random frame, unrelated to the payout
    Teaser(Outcome),
    /// Authoritative outcome used for settlement
    Final(Outcome),
}

impl Frame {
    pub fn outcome(&self) -> &Outcome {
        match self {
            Frame::Teaser(outcome) | Frame::Final(outcome) => outcome,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Frame::Final(_))
    }

    /// Text shown to the player for this frame
    pub fn render(&self) -> String {
        let icon = match self.outcome().game_type() {
            GameType::Slots => "🎰",
            GameType::Roulette => "🎲",
        };
        match self {
            Frame::Teaser(outcome) => format!("{icon} Spinning...\n{outcome}"),
            Frame::Final(outcome) => format!("{icon} {outcome}"),
        }
    }
}

/// Lazy teaser-then-final frame sequence
pub struct RevealSequence<R> {
    final_outcome: Option<Outcome>,
    teasers_left: usize,
    rng: R,
}

impl<R: RandomSource> RevealSequence<R> {
    /// Build a sequence ending in `outcome`
    ///
    /// Teaser frames are drawn from `rng` when they are pulled, never ahead of time.
    pub fn new(outcome: Outcome, teaser_frames: usize, rng: R) -> Self {
        Self {
            final_outcome: Some(outcome),
            teasers_left: teaser_frames,
            rng,
        }
    }

    /// Frames not yet yielded
    pub fn remaining(&self) -> usize {
        self.teasers_left + usize::from(self.final_outcome.is_some())
    }
}

impl<R: RandomSource> Iterator for RevealSequence<R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let outcome = self.final_outcome?;
        if self.teasers_left > 0 {
            self.teasers_left -= 1;
            return Some(Frame::Teaser(Outcome::draw(
                outcome.game_type(),
                &mut self.rng,
            )));
        }
        self.final_outcome.take().map(Frame::Final)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<R: RandomSource> ExactSizeIterator for RevealSequence<R> {}

impl<R: RandomSource> FusedIterator for RevealSequence<R> {}
