//! Progress engine: the per-player state machine.
//!
//! Per level: `Unanswered -> (correct) -> PendingAd -> (ad completed) ->
//! Settled`, while a wrong answer leaves the level unanswered. Every
//! mutation is staged on a copy of the state and only becomes visible once
//! the copy has been persisted, so a failed operation changes nothing.

use super::migration::migrate_state;
use super::state::{PendingReward, ProgressState};
use super::stats::{self, ProgressStats};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::identity::PlayerIdentity;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::level::{LevelGenerator, PuzzleLevel};
use crate::localization::{Locale, LocalizedText};
use crate::remote::{MirrorEvent, NoopMirror, RemoteMirror};
use crate::shop::{ShopItem, ShopOrder};
use crate::storage::KeyValueStore;
use fluent::FluentArgs;
use serde::{Deserialize, Serialize};

pub const STATE_KEY: &str = "bit3k_game_state";

/// What the player faces after an advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "level", rename_all = "camelCase")]
pub enum Progression {
    Playing(Box<PuzzleLevel>),
    Complete,
}

impl Progression {
    pub fn level(&self) -> Option<&PuzzleLevel> {
        match self {
            Progression::Playing(level) => Some(level),
            Progression::Complete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Progression::Complete)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub correct: bool,
    pub needs_ad: bool,
    /// Pending reward amount; 0 when incorrect.
    pub amount: f64,
    /// A correct answer repeated while its reward was already pending.
    pub duplicate: bool,
    pub attempts: u32,
    pub message: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSettlement {
    /// False when there was nothing to settle.
    pub settled: bool,
    pub amount: f64,
    pub balance: f64,
    pub next: Progression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintReveal {
    pub hint: LocalizedText,
    pub cost: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipOutcome {
    pub skipped_level: u32,
    pub cost: f64,
    pub balance: f64,
    pub next: Progression,
}

pub struct ProgressEngine<S: KeyValueStore> {
    generator: LevelGenerator,
    store: S,
    state: ProgressState,
    /// The level most recently shown, so answers are checked against the
    /// options the player actually saw.
    served: Option<PuzzleLevel>,
    mirror: Box<dyn RemoteMirror>,
    leaderboard: Leaderboard,
}

impl<S: KeyValueStore> ProgressEngine<S> {
    /// Build an engine over `store`, loading any persisted state. A missing,
    /// unreadable or malformed record falls back to a fresh state.
    pub fn new(config: GameConfig, store: S) -> GameResult<Self> {
        let leaderboard = Leaderboard::new(config.leaderboard_size);
        let generator = LevelGenerator::new(config)?;
        let state = load_state(&store, generator.max_level());

        Ok(Self {
            generator,
            store,
            state,
            served: None,
            mirror: Box::new(NoopMirror),
            leaderboard,
        })
    }

    pub fn with_mirror(mut self, mirror: impl RemoteMirror + 'static) -> Self {
        self.mirror = Box::new(mirror);
        self
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.generator.config()
    }

    pub fn generator(&self) -> &LevelGenerator {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The level at `currentLevel`, options always present.
    pub fn get_current_level(&mut self) -> GameResult<PuzzleLevel> {
        if self.state.finished {
            return Err(GameError::GameComplete);
        }
        let number = self.state.current_level;
        match &self.served {
            Some(level) if level.level_number == number => Ok(level.clone()),
            _ => {
                let level = self.generator.level(number)?;
                self.served = Some(level.clone());
                Ok(level)
            }
        }
    }

    pub fn progression(&mut self) -> GameResult<Progression> {
        if self.state.finished {
            return Ok(Progression::Complete);
        }
        Ok(Progression::Playing(Box::new(self.get_current_level()?)))
    }

    pub fn submit_answer(&mut self, input: &str) -> GameResult<SubmitOutcome> {
        let level = self.get_current_level()?;
        let number = level.level_number;

        let correct = match level.resolve_selection(input) {
            Ok(resolved) => level.is_correct(&resolved),
            Err(e) => {
                tracing::debug!(level = number, error = %e, "selection treated as incorrect");
                false
            }
        };

        let mut next = self.state.clone();
        let attempts = next.record_attempt(number);
        next.touch();

        if !correct {
            self.commit(next)?;
            tracing::debug!(level = number, attempts, "incorrect answer");
            return Ok(SubmitOutcome {
                correct: false,
                needs_ad: false,
                amount: 0.0,
                duplicate: false,
                attempts,
                message: self.message("feedback-incorrect", None),
            });
        }

        // An unsettled reward for the previous level still needs its ad.
        let outstanding = self.settleable().ok().filter(|p| p.level != number);
        let (amount, duplicate) = match (outstanding, next.pending_reward) {
            (Some(earlier), _) => {
                tracing::info!(
                    pending_level = earlier.level,
                    level = number,
                    "earlier reward still awaiting its ad"
                );
                (earlier.amount, false)
            }
            (None, Some(pending)) if pending.level == number => (pending.amount, true),
            (None, other) => {
                if let Some(stale) = other {
                    tracing::warn!(
                        stale_level = stale.level,
                        level = number,
                        "replacing pending reward for another level"
                    );
                }
                next.pending_reward = Some(PendingReward { level: number, amount: level.reward });
                (level.reward, false)
            }
        };

        self.commit(next)?;
        if duplicate {
            tracing::debug!(level = number, "correct answer repeated while reward pending");
        } else {
            tracing::info!(level = number, amount, "reward parked until ad completes");
        }

        Ok(SubmitOutcome {
            correct: true,
            needs_ad: true,
            amount,
            duplicate,
            attempts,
            message: self.message("feedback-correct-pending", Some(("amount", format_amount(amount)))),
        })
    }

    /// Settle the pending reward once the external ad flow completes. Without
    /// a matching pending reward this changes nothing.
    pub fn complete_ad_and_advance(&mut self) -> GameResult<AdSettlement> {
        let pending = match self.settleable() {
            Ok(pending) => pending,
            Err(GameError::NoPendingReward) => {
                tracing::debug!(level = self.state.current_level, "ad completed with nothing to settle");
                return Ok(AdSettlement {
                    settled: false,
                    amount: 0.0,
                    balance: self.state.balance,
                    next: self.progression()?,
                });
            }
            Err(e) => return Err(e),
        };

        let mut next = self.state.clone();
        next.balance += pending.amount;
        next.total_earned += pending.amount;
        next.mark_completed(pending.level);
        next.pending_reward = None;
        next.ads_watched_count += 1;
        let target = next.current_level.max(pending.level.saturating_add(1));
        self.advance_to(&mut next, target);
        next.touch();

        self.commit(next)?;
        tracing::info!(
            level = pending.level,
            amount = pending.amount,
            balance = self.state.balance,
            "reward settled"
        );
        self.notify(MirrorEvent::AdCompleted { level: pending.level, amount: pending.amount });

        Ok(AdSettlement {
            settled: true,
            amount: pending.amount,
            balance: self.state.balance,
            next: self.progression()?,
        })
    }

    /// The pending reward, if it belongs to the current level or the one just
    /// before it.
    fn settleable(&self) -> GameResult<PendingReward> {
        let current = self.state.current_level;
        match self.state.pending_reward {
            Some(p) if p.level == current || p.level.saturating_add(1) == current => Ok(p),
            _ => Err(GameError::NoPendingReward),
        }
    }

    pub fn use_hint(&mut self) -> GameResult<HintReveal> {
        let level = self.get_current_level()?;
        let hint = level.hint.clone().ok_or(GameError::NoHint { level: level.level_number })?;
        let cost = self.config().hint_cost(level.reward);

        let mut next = self.state.clone();
        debit(&mut next, cost)?;
        next.touch();
        self.commit(next)?;

        tracing::info!(level = level.level_number, cost, "hint purchased");
        Ok(HintReveal { hint, cost, balance: self.state.balance })
    }

    /// Paid bypass: advances without crediting or completing the level.
    pub fn skip_level(&mut self) -> GameResult<SkipOutcome> {
        let level = self.get_current_level()?;
        let cost = self.config().skip_cost(level.reward);

        let mut next = self.state.clone();
        debit(&mut next, cost)?;
        if next.pending_reward.is_some_and(|p| p.level == level.level_number) {
            next.pending_reward = None;
        }
        self.advance_to(&mut next, level.level_number.saturating_add(1));
        next.touch();
        self.commit(next)?;

        tracing::info!(level = level.level_number, cost, "level skipped");
        Ok(SkipOutcome {
            skipped_level: level.level_number,
            cost,
            balance: self.state.balance,
            next: self.progression()?,
        })
    }

    pub fn reset_game(&mut self) -> GameResult<()> {
        self.commit(ProgressState::default())?;
        self.served = None;
        tracing::info!("game reset");
        Ok(())
    }

    /// Spend points on a shop item. Reduces `balance`, never `totalEarned`.
    pub fn redeem(&mut self, item: ShopItem, recipient: &str) -> GameResult<ShopOrder> {
        let recipient = item.validate_recipient(recipient)?;
        let order = ShopOrder::new(item, recipient);

        let mut next = self.state.clone();
        debit(&mut next, order.points_cost)?;
        next.orders.push(order.clone());
        next.touch();
        self.commit(next)?;

        tracing::info!(order = %order.id, item = %item, cost = order.points_cost, "order placed");
        self.notify(MirrorEvent::OrderPlaced(order.clone()));
        Ok(order)
    }

    /// Locally cached ranking; see [`Leaderboard`].
    pub fn leaderboard(
        &mut self,
        identity: Option<&PlayerIdentity>,
    ) -> GameResult<Vec<LeaderboardEntry>> {
        let score = self.state.balance;
        let entries = self.leaderboard.refresh(&mut self.store, identity, score)?;
        if let Some(identity) = identity {
            self.notify(MirrorEvent::ScoreUpdated { player_id: identity.id.clone(), score });
        }
        Ok(entries)
    }

    pub fn stats(&self) -> ProgressStats {
        ProgressStats::from_state(&self.state, self.generator.max_level())
    }

    pub fn is_level_completed(&self, level_number: u32) -> bool {
        self.state.completed_level_set.contains(&level_number)
    }

    pub fn is_level_unlocked(&self, level_number: u32) -> bool {
        level_number >= 1 && level_number <= self.state.current_level
    }

    pub fn difficulty_badge(&self, tier: u8, locale: Locale) -> String {
        stats::difficulty_badge(self.generator.catalog(), tier, locale)
    }

    /// Render a feedback message in both locales.
    pub fn message(&self, key: &str, arg: Option<(&str, String)>) -> LocalizedText {
        let catalog = self.generator.catalog();
        let mut args = FluentArgs::new();
        if let Some((name, value)) = arg {
            args.set(name.to_string(), value);
        }
        LocalizedText::new(
            catalog.format(Locale::En, key, Some(&args)),
            catalog.format(Locale::Ar, key, Some(&args)),
        )
    }

    fn advance_to(&self, next: &mut ProgressState, target: u32) {
        let max_level = self.generator.max_level();
        if target > max_level {
            next.current_level = max_level;
            next.finished = true;
        } else {
            next.current_level = target;
        }
    }

    /// Persist `next`, then make it the live state.
    fn commit(&mut self, next: ProgressState) -> GameResult<()> {
        let json = serde_json::to_string(&next)?;
        self.store.save(STATE_KEY, &json)?;
        self.state = next;
        Ok(())
    }

    fn notify(&self, event: MirrorEvent) {
        if let Err(e) = self.mirror.mirror(event) {
            tracing::warn!(error = %e, "remote mirror failed; local state unaffected");
        }
    }
}

/// Subtract `cost` from the balance, refusing to go negative.
fn debit(state: &mut ProgressState, cost: f64) -> GameResult<()> {
    if state.balance < cost {
        return Err(GameError::InsufficientBalance { needed: cost, available: state.balance });
    }
    state.balance = (state.balance - cost).max(0.0);
    Ok(())
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn load_state<S: KeyValueStore>(store: &S, max_level: u32) -> ProgressState {
    let raw = match store.load(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ProgressState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved progress; starting fresh");
            return ProgressState::default();
        }
    };

    match serde_json::from_str::<ProgressState>(&raw) {
        Ok(state) => migrate_state(state, max_level),
        Err(e) => {
            let err = GameError::from(e);
            tracing::warn!(error = %err, "saved progress unusable; starting fresh");
            ProgressState::default()
        }
    }
}
