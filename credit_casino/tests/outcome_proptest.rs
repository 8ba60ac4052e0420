/// Property-based tests for outcome classification using proptest
///
/// Every possible draw must map to exactly one payout bucket, and the
/// reveal must always end with the outcome that was settled.
use credit_casino::games::{
    GameType, Outcome, RouletteSpin, SequenceRandom, SlotSpin, Symbol, resolve,
    roulette::{Color, RED_NUMBERS},
};
use credit_casino::reveal::RevealSequence;
use proptest::prelude::*;

fn symbol_strategy() -> impl Strategy<Value = Symbol> {
    (0usize..Symbol::ALL.len()).prop_map(|i| Symbol::ALL[i])
}

proptest! {
    #[test]
    fn test_slot_payout_is_one_of_three_buckets(
        reels in [symbol_strategy(), symbol_strategy(), symbol_strategy()],
        stake in 1i64..1_000,
    ) {
        let spin = SlotSpin::new(reels);
        let payout = spin.payout(stake);
        let [a, b, c] = reels;

        if a == b && b == c {
            prop_assert_eq!(payout, 50);
        } else if a == b || b == c {
            prop_assert_eq!(payout, 20);
        } else {
            prop_assert_eq!(payout, -stake);
        }
    }

    #[test]
    fn test_roulette_payout_is_one_of_three_buckets(number in 0u8..37, stake in 1i64..1_000) {
        let spin = RouletteSpin::new(number);
        let payout = spin.payout(stake);

        match spin.color {
            Color::Green => {
                prop_assert_eq!(number, 0);
                prop_assert_eq!(payout, 35 * stake);
            }
            Color::Red => {
                prop_assert!(RED_NUMBERS.contains(&number));
                prop_assert_eq!(payout, stake * 3 / 2);
            }
            Color::Black => {
                prop_assert!(number != 0 && !RED_NUMBERS.contains(&number));
                prop_assert_eq!(payout, -stake);
            }
        }
    }

    #[test]
    fn test_reveal_ends_with_settled_outcome(
        draws in prop::collection::vec(any::<u32>(), 1..8),
        teasers in 0usize..12,
        roulette in any::<bool>(),
    ) {
        let game = if roulette { GameType::Roulette } else { GameType::Slots };
        let resolution = resolve(game, 10, &mut SequenceRandom::new(draws.clone()));

        let frames: Vec<_> = RevealSequence::new(
            resolution.outcome,
            teasers,
            SequenceRandom::new(draws),
        )
        .collect();

        prop_assert_eq!(frames.len(), teasers + 1);
        prop_assert_eq!(frames.iter().filter(|f| f.is_final()).count(), 1);
        let last = frames.last().unwrap();
        prop_assert!(last.is_final());
        prop_assert_eq!(last.outcome(), &resolution.outcome);
        prop_assert_eq!(resolution.outcome.payout(10), resolution.payout);
        prop_assert!(matches!(
            (game, resolution.outcome),
            (GameType::Slots, Outcome::Slots(_)) | (GameType::Roulette, Outcome::Roulette(_))
        ));
    }
}
