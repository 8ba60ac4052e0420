//! Wager orchestration: validate, resolve, settle, reveal, notify.

use super::{
    config::CasinoConfig,
    errors::{WagerError, WagerResult},
    locks::AccountLocks,
    messages::{Intent, Reply, Wager, WagerReceipt},
};
use crate::{
    games::{self, GameType, RandomSource, Resolution, SystemRandom},
    ledger::{AccountId, Ledger},
    reveal::{self, Presenter, RevealSequence},
};
use std::sync::{Mutex, PoisonError};

/// Wager settled in the ledger, not yet shown to the player
struct Settlement {
    wager: Wager,
    resolution: Resolution,
    balance: i64,
    plays: i64,
}

/// Entry point for every player intent
///
/// Wagers on the same account run one at a time: validation, outcome and
/// settlement happen under the account's lock. The paced reveal runs after
/// the lock is released, so a slow or closed channel never delays the next
/// wager and never undoes a settlement.
pub struct WagerOrchestrator {
    ledger: Ledger,
    config: CasinoConfig,
    locks: AccountLocks,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl WagerOrchestrator {
    pub fn new(ledger: Ledger, config: CasinoConfig) -> Self {
        Self {
            ledger,
            config,
            locks: AccountLocks::new(),
            rng: Mutex::new(Box::new(SystemRandom::new())),
        }
    }

    /// Replace the outcome random source
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &CasinoConfig {
        &self.config
    }

    /// Handle one intent, delivering every message through `presenter`
    ///
    /// Presentation failures are logged and never change the returned reply.
    pub async fn handle<P>(&self, intent: Intent, presenter: &mut P) -> Reply
    where
        P: Presenter + ?Sized,
    {
        let reply = match intent {
            Intent::Start { account_id, label } => self.start(account_id, &label).await,
            Intent::QueryBalance { account_id } => self.balance(account_id).await,
            Intent::PlaySlots { account_id } => {
                return self.play(account_id, GameType::Slots, presenter).await;
            }
            Intent::PlayRoulette { account_id } => {
                return self.play(account_id, GameType::Roulette, presenter).await;
            }
        };

        if let Err(e) = presenter.send_text(&reply.text()).await {
            log::debug!("Could not deliver reply: {}", e);
        }

        reply
    }

    /// Create the account if needed and report its balance
    pub async fn start(&self, id: AccountId, label: &str) -> Reply {
        let result = async {
            let created = self.ledger.ensure_account(id, label).await?;
            let balance = self.ledger.get_balance(id).await?;
            Ok::<_, WagerError>(Reply::Started { created, balance })
        }
        .await;

        result.unwrap_or_else(|e| {
            log::warn!("Start failed for account {}: {}", id, e);
            Reply::Rejected(e)
        })
    }

    /// Current balance; read-only
    pub async fn balance(&self, id: AccountId) -> Reply {
        match self.ledger.get_balance(id).await {
            Ok(credits) => Reply::Balance { credits },
            Err(e) => Reply::Rejected(e.into()),
        }
    }

    /// Play one round of `game` for an account
    ///
    /// Rejected wagers change nothing. A settled wager stays settled even
    /// if the reveal, result or promotion cannot be delivered.
    pub async fn play<P>(&self, id: AccountId, game: GameType, presenter: &mut P) -> Reply
    where
        P: Presenter + ?Sized,
    {
        let settlement = match self.settle(id, game).await {
            Ok(settlement) => settlement,
            Err(e) => {
                match &e {
                    WagerError::StorageFailure(_) => {
                        log::error!("Wager on {} for account {} failed: {}", game, id, e)
                    }
                    _ => log::info!("Wager on {} for account {} rejected: {}", game, id, e),
                }
                if let Err(e) = presenter.send_text(&e.client_message()).await {
                    log::debug!("Could not deliver rejection: {}", e);
                }
                return Reply::Rejected(e);
            }
        };

        let Settlement {
            wager,
            resolution,
            balance,
            plays,
        } = settlement;

        let sequence = RevealSequence::new(
            resolution.outcome,
            self.config.reveal_steps,
            SystemRandom::new(),
        );
        let reveal = reveal::play(sequence, presenter, self.config.reveal_delay()).await;

        let promotion = self.config.promotion.is_due(plays);
        let receipt = WagerReceipt {
            wager_id: wager.id,
            account_id: id,
            game_type: game,
            stake: wager.stake,
            outcome: resolution.outcome,
            payout: resolution.payout,
            balance,
            plays,
            promotion,
            reveal,
        };

        if receipt.reveal.is_completed() {
            if let Err(e) = presenter.send_text(&receipt.result_text()).await {
                log::debug!("Could not deliver result of wager {}: {}", wager.id, e);
            } else if promotion
                && let Err(e) = presenter.send_text(&self.config.promotion_message).await
            {
                log::debug!("Could not deliver promotion to account {}: {}", id, e);
            }
        }

        if promotion {
            log::info!("Promotion due for account {} after {} {} plays", id, plays, game);
        }

        Reply::Settled(receipt)
    }

    /// Validate, resolve and settle under the account lock
    async fn settle(&self, id: AccountId, game: GameType) -> WagerResult<Settlement> {
        let stake = self.config.stake(game);
        let mut wager = Wager::request(id, game, stake);

        // Accounts are never removed, so only started accounts get a lock
        if !self.ledger.account_exists(id).await? {
            wager.reject();
            return Err(WagerError::UnknownAccount(id));
        }

        let _guard = self.locks.acquire(id).await;

        let account = self.ledger.get_account(id).await?;
        let played = account.play_count(game);

        if self.config.promotion.blocks(played) {
            wager.reject();
            return Err(WagerError::PlayLimitReached {
                game,
                limit: self.config.promotion.limit().unwrap_or(played),
            });
        }

        if account.credits < stake {
            wager.reject();
            return Err(WagerError::InsufficientFunds {
                available: account.credits,
                required: stake,
            });
        }
        wager.validate();

        let resolution = self.resolve(game, stake);
        wager.resolve(resolution);

        let balance = match self
            .ledger
            .apply_payout(id, game, resolution.payout, wager.idempotency_key())
            .await
        {
            Ok(balance) => balance,
            Err(e) => {
                wager.reject();
                return Err(e.into());
            }
        };
        wager.settle();

        // Counter read happens under the lock, so it reflects this wager
        let plays = match self.ledger.get_play_count(id, game).await {
            Ok(plays) => plays,
            Err(e) => {
                log::warn!("Could not re-read play count for account {}: {}", id, e);
                played + 1
            }
        };

        log::info!(
            "Wager {} settled: account={} game={} stake={} payout={:+} balance={}",
            wager.id,
            id,
            game,
            stake,
            resolution.payout,
            balance
        );

        Ok(Settlement {
            wager,
            resolution,
            balance,
            plays,
        })
    }

    fn resolve(&self, game: GameType, stake: i64) -> Resolution {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        games::resolve(game, stake, &mut *rng)
    }
}
