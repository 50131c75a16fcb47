use super::BossKind;
use crate::{
    Card, ConfigError, GameConfig, HandKind, HandLevelState, JokerSlots, RandomSource, Suit,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Why the active boss refuses a hand. Checked before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayRejected {
    #[error("{} was already played this round", .0.id())]
    RepeatedHandType(HandKind),
    #[error("only {} may be played this round", .0.id())]
    NotFirstHandType(HandKind),
    #[error("exactly 5 cards must be played, got {0}")]
    RequiresFiveCards(usize),
    #[error("card {0} must be part of the played hand")]
    MissingRequiredCard(u32),
}

/// What the boss did after a hand was scored; the session applies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BossAftermath {
    /// Indices into the held cards to discard, ascending.
    pub discard_held: Vec<usize>,
    pub money_delta: i64,
    pub money_set: Option<i64>,
    pub level_reduced: Option<HandKind>,
}

/// Active boss plus everything it remembers. Round-scoped fields reset in
/// [`BossState::on_round_end`], ante-scoped ones in [`BossState::on_new_ante`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossState {
    pub current_boss: Option<BossKind>,
    #[serde(default)]
    pub boss_disabled: bool,
    pub played_hand_types: BTreeSet<HandKind>,
    pub first_hand_played: Option<HandKind>,
    pub hand_levels_reduced: BTreeMap<HandKind, u32>,
    pub cards_played_this_ante: BTreeSet<u32>,
    pub most_played_hand: Option<HandKind>,
    pub hand_play_counts: BTreeMap<HandKind, u32>,
    #[serde(default)]
    pub required_card_id: Option<u32>,
    #[serde(default)]
    pub joker_sold: bool,
}

impl BossState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_boss(&mut self, boss: BossKind) {
        debug!(target: "ante::boss", boss = ?boss, "boss active");
        self.current_boss = Some(boss);
        self.boss_disabled = false;
    }

    pub fn clear_boss(&mut self) {
        self.current_boss = None;
        self.boss_disabled = false;
        self.required_card_id = None;
    }

    /// Leave the boss in place but strip every effect it has.
    pub fn disable_boss(&mut self) {
        if self.current_boss.is_some() {
            debug!(target: "ante::boss", boss = ?self.current_boss, "boss disabled");
        }
        self.boss_disabled = true;
        self.required_card_id = None;
    }

    /// Boss whose rules are in force, if any.
    pub fn active(&self) -> Option<BossKind> {
        if self.boss_disabled {
            None
        } else {
            self.current_boss
        }
    }

    fn is(&self, boss: BossKind) -> bool {
        self.active() == Some(boss)
    }

    pub fn can_play_hand(&self, kind: HandKind, cards: &[Card]) -> Result<(), PlayRejected> {
        match self.active() {
            Some(BossKind::Eye) if self.played_hand_types.contains(&kind) => {
                Err(PlayRejected::RepeatedHandType(kind))
            }
            Some(BossKind::Mouth) => match self.first_hand_played {
                Some(first) if first != kind => Err(PlayRejected::NotFirstHandType(first)),
                _ => Ok(()),
            },
            Some(BossKind::Psychic) if cards.len() != 5 => {
                Err(PlayRejected::RequiresFiveCards(cards.len()))
            }
            Some(BossKind::CeruleanBell) => match self.required_card_id {
                Some(id) if !cards.iter().any(|card| card.id == id) => {
                    Err(PlayRejected::MissingRequiredCard(id))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Record a legal hand before it is scored. `most_played` is the run-wide
    /// most played hand as it stood before this hand.
    pub fn before_play_hand(&mut self, kind: HandKind, most_played: Option<HandKind>) {
        self.played_hand_types.insert(kind);
        self.first_hand_played.get_or_insert(kind);
        *self.hand_play_counts.entry(kind).or_insert(0) += 1;
        self.most_played_hand = most_played;
    }

    pub fn after_play_hand(
        &mut self,
        kind: HandKind,
        played: &[Card],
        held: &[Card],
        levels: &HandLevelState,
        rng: &mut dyn RandomSource,
    ) -> BossAftermath {
        let mut aftermath = BossAftermath::default();
        match self.active() {
            Some(BossKind::Hook) => {
                let mut pool: Vec<usize> = (0..held.len()).collect();
                for _ in 0..2 {
                    let Some(pick) = rng.pick_index(pool.len()) else {
                        break;
                    };
                    aftermath.discard_held.push(pool.remove(pick));
                }
                aftermath.discard_held.sort_unstable();
            }
            Some(BossKind::Tooth) => aftermath.money_delta = -(played.len() as i64),
            Some(BossKind::Ox) if self.most_played_hand == Some(kind) => {
                aftermath.money_set = Some(0);
            }
            Some(BossKind::Arm) => {
                let cap = levels.level(kind).saturating_sub(1);
                let reduced = self.hand_levels_reduced.entry(kind).or_insert(0);
                if *reduced < cap {
                    *reduced += 1;
                    aftermath.level_reduced = Some(kind);
                }
            }
            _ => {}
        }
        self.cards_played_this_ante
            .extend(played.iter().map(|card| card.id));
        aftermath
    }

    /// Boss-blind target: base × the boss multiplier, or ×2 with no active
    /// boss.
    pub fn modify_target_score(&self, base: i64, config: &GameConfig) -> Result<i64, ConfigError> {
        let multiplier = match self.active() {
            Some(boss) => config.boss_rule(boss)?.score_multiplier,
            None => 2.0,
        };
        Ok((base as f64 * multiplier).floor() as i64)
    }

    pub fn modify_hand_size(&self, base: usize) -> usize {
        if self.is(BossKind::Manacle) {
            base.saturating_sub(1)
        } else {
            base
        }
    }

    pub fn modify_hands(&self, base: u32) -> u32 {
        if self.is(BossKind::Needle) {
            base.min(1)
        } else {
            base
        }
    }

    pub fn modify_discards(&self, base: u32) -> u32 {
        if self.is(BossKind::Water) {
            0
        } else {
            base
        }
    }

    pub fn is_card_disabled(&self, card: &Card) -> bool {
        self.is_card_disabled_with(card, false)
    }

    pub fn is_card_disabled_with(&self, card: &Card, all_face: bool) -> bool {
        let locked_suit = match self.active() {
            Some(BossKind::Club) => Some(Suit::Clubs),
            Some(BossKind::Goad) => Some(Suit::Spades),
            Some(BossKind::Window) => Some(Suit::Diamonds),
            Some(BossKind::Head) => Some(Suit::Hearts),
            Some(BossKind::Plant) => return card.is_face(all_face),
            Some(BossKind::Pillar) => return self.cards_played_this_ante.contains(&card.id),
            Some(BossKind::VerdantLeaf) => return !self.joker_sold,
            _ => None,
        };
        locked_suit.is_some_and(|suit| card.has_suit(suit, false))
    }

    /// Reduction applied to the hand's level; zero unless it was played
    /// under the Arm.
    pub fn level_reduction(&self, kind: HandKind) -> u32 {
        if self.active().is_none() {
            return 0;
        }
        self.hand_levels_reduced.get(&kind).copied().unwrap_or(0)
    }

    /// Whether base chips and mult are halved before scoring.
    pub fn halves_base(&self) -> bool {
        self.is(BossKind::Flint)
    }

    /// Whether a freshly drawn card arrives face down.
    pub fn draw_face_down(&self, card: &Card, all_face: bool, rng: &mut dyn RandomSource) -> bool {
        match self.active() {
            Some(BossKind::House) => self.first_hand_played.is_none(),
            Some(BossKind::Wheel) => rng.one_in(7),
            Some(BossKind::Mark) => card.is_face(all_face),
            Some(BossKind::Fish) => self.first_hand_played.is_some(),
            _ => false,
        }
    }

    /// Cards drawn after a play or discard.
    pub fn draw_after_action(&self, default: usize) -> usize {
        if self.is(BossKind::Serpent) {
            3
        } else {
            default
        }
    }

    pub fn on_blind_select(&mut self, jokers: &mut JokerSlots, rng: &mut dyn RandomSource) {
        if self.is(BossKind::AmberAcorn) {
            for joker in jokers.iter_mut() {
                joker.face_down = true;
            }
            jokers.shuffle_with(rng);
        }
    }

    pub fn on_hand_start(
        &mut self,
        jokers: &mut JokerSlots,
        held: &[Card],
        rng: &mut dyn RandomSource,
    ) {
        match self.active() {
            Some(BossKind::CrimsonHeart) => {
                for joker in jokers.iter_mut() {
                    joker.disabled = false;
                }
                if let Some(pick) = rng.pick_index(jokers.len()) {
                    if let Some(joker) = jokers.get_mut(pick) {
                        joker.disabled = true;
                    }
                }
            }
            Some(BossKind::CeruleanBell) => {
                let still_held = self
                    .required_card_id
                    .is_some_and(|id| held.iter().any(|card| card.id == id));
                if !still_held {
                    self.required_card_id = rng
                        .pick_index(held.len())
                        .and_then(|pick| held.get(pick))
                        .map(|card| card.id);
                }
            }
            _ => {}
        }
    }

    pub fn on_joker_sold(&mut self) {
        self.joker_sold = true;
    }

    pub fn on_round_start(&mut self) {
        self.reset_round();
    }

    /// Round over: forget round memory, drop the boss and undo what it did
    /// to the jokers.
    pub fn on_round_end(&mut self, jokers: &mut JokerSlots) {
        self.reset_round();
        self.clear_boss();
        for joker in jokers.iter_mut() {
            joker.disabled = false;
            joker.face_down = false;
        }
    }

    pub fn on_new_ante(&mut self) {
        self.reset_round();
        self.cards_played_this_ante.clear();
        self.hand_play_counts.clear();
        self.most_played_hand = None;
        self.clear_boss();
    }

    fn reset_round(&mut self) {
        self.played_hand_types.clear();
        self.first_hand_played = None;
        self.hand_levels_reduced.clear();
        self.required_card_id = None;
        self.joker_sold = false;
    }

    pub fn get_state(&self) -> BossState {
        self.clone()
    }

    pub fn restore_state(&mut self, state: BossState) {
        *self = state;
    }
}
