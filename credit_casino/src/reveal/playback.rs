//! Paced playback of reveal sequences to a presentation channel.

use super::{Frame, RevealSequence};
use crate::games::RandomSource;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::time::{Duration, sleep};

/// Presentation delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// The channel to the player is gone (socket closed, chat unreachable)
    #[error("Presentation channel closed")]
    ChannelClosed,

    /// A single message could not be delivered
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound side of the transport
///
/// Implemented by whatever delivers text to the player: a chat message
/// editor, a WebSocket, or a recorder in tests.
#[async_trait]
pub trait Presenter: Send {
    /// Show a reveal frame, replacing the previous one
    async fn show_frame(&mut self, frame: &Frame) -> Result<(), PresentationError>;

    /// Send a standalone text message (result line, promotion)
    async fn send_text(&mut self, text: &str) -> Result<(), PresentationError>;
}

/// How a reveal ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevealStatus {
    /// Every frame, including the final one, was delivered
    Completed { frames: usize },
    /// Delivery failed; remaining frames were dropped
    Cancelled { frames: usize, reason: String },
}

impl RevealStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RevealStatus::Completed { .. })
    }
}

/// Drive `sequence` against `presenter`, waiting `pacing` between frames
///
/// Stops at the first delivery failure without pulling further frames.
pub async fn play<R, P>(
    sequence: RevealSequence<R>,
    presenter: &mut P,
    pacing: Duration,
) -> RevealStatus
where
    R: RandomSource,
    P: Presenter + ?Sized,
{
    let mut shown = 0;

    for frame in sequence {
        if shown > 0 && !pacing.is_zero() {
            sleep(pacing).await;
        }

        if let Err(e) = presenter.show_frame(&frame).await {
            log::debug!("Reveal cancelled after {} frame(s): {}", shown, e);
            return RevealStatus::Cancelled {
                frames: shown,
                reason: e.to_string(),
            };
        }
        shown += 1;
    }

    RevealStatus::Completed { frames: shown }
}

/// Presenter that keeps everything it is shown
///
/// Used by request/response transports to collect a whole play, and by tests.
/// `fail_after` makes frame delivery fail once that many frames were shown.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub frames: Vec<Frame>,
    pub messages: Vec<String>,
    fail_after: Option<usize>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter whose channel closes after `frames` delivered frames
    pub fn failing_after(frames: usize) -> Self {
        Self {
            fail_after: Some(frames),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn show_frame(&mut self, frame: &Frame) -> Result<(), PresentationError> {
        if self.fail_after.is_some_and(|limit| self.frames.len() >= limit) {
            return Err(PresentationError::ChannelClosed);
        }
        self.frames.push(*frame);
        Ok(())
    }

    async fn send_text(&mut self, text: &str) -> Result<(), PresentationError> {
        if self.fail_after.is_some_and(|limit| self.frames.len() >= limit) {
            return Err(PresentationError::ChannelClosed);
        }
        self.messages.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Outcome, RouletteSpin, SequenceRandom};

    fn sequence(teasers: usize) -> RevealSequence<SequenceRandom> {
        RevealSequence::new(
            Outcome::Roulette(RouletteSpin::new(12)),
            teasers,
            SequenceRandom::new(vec![4, 8, 15, 16, 23, 42]),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_paces_frames() {
        let mut presenter = RecordingPresenter::new();
        let started = tokio::time::Instant::now();

        let status = play(sequence(8), &mut presenter, Duration::from_millis(200)).await;

        assert_eq!(status, RevealStatus::Completed { frames: 9 });
        assert_eq!(presenter.frames.len(), 9);
        assert!(presenter.frames[8].is_final());
        assert!(started.elapsed() >= Duration::from_millis(8 * 200));
    }

    #[tokio::test]
    async fn test_play_stops_on_delivery_failure() {
        let mut presenter = RecordingPresenter::failing_after(3);

        let status = play(sequence(8), &mut presenter, Duration::ZERO).await;

        assert!(!status.is_completed());
        assert!(matches!(status, RevealStatus::Cancelled { frames: 3, .. }));
        assert_eq!(presenter.frames.len(), 3);
        assert!(presenter.frames.iter().all(|f| !f.is_final()));
    }
}
