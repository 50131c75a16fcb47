use crate::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The single event kind a joker responds to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Scored,
    Held,
    Discard,
    Play,
    Independent,
    HandPlayed,
    Reroll,
    BlindSelect,
    EndOfRound,
    CardAdded,
    ShopExit,
    Sell,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 12] = [
        TriggerKind::Scored,
        TriggerKind::Held,
        TriggerKind::Discard,
        TriggerKind::Play,
        TriggerKind::Independent,
        TriggerKind::HandPlayed,
        TriggerKind::Reroll,
        TriggerKind::BlindSelect,
        TriggerKind::EndOfRound,
        TriggerKind::CardAdded,
        TriggerKind::ShopExit,
        TriggerKind::Sell,
    ];
}

/// Side effects an effect can request. They merge by set union and are
/// carried out by the owner of the relevant state, never by the effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectFlag {
    DestroySelf,
    DestroyCard,
    CopyCardToDeck,
    AddStoneCard,
    UpgradePlayedHand,
    CreateTarot,
    CreatePlanet,
    CopyConsumable,
    DisableBoss,
}

/// End-of-round generation signalled by jokers during scoring; executed by
/// the caller. Cards still held at round end are paid out by the run itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeferredEffect {
    PlanetForHand,
}

/// One pure effect value. Deltas compose with [`EffectDelta::merge`]: sums
/// for the additive fields, product for `x_mult`, union for `flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDelta {
    pub chips: i64,
    pub mult: f64,
    pub x_mult: f64,
    pub money: i64,
    pub retriggers: u32,
    pub hands: i32,
    pub discards: i32,
    pub hand_size: i32,
    pub sell_value: i64,
    pub flags: BTreeSet<EffectFlag>,
}

impl Default for EffectDelta {
    fn default() -> Self {
        Self {
            chips: 0,
            mult: 0.0,
            x_mult: 1.0,
            money: 0,
            retriggers: 0,
            hands: 0,
            discards: 0,
            hand_size: 0,
            sell_value: 0,
            flags: BTreeSet::new(),
        }
    }
}

impl EffectDelta {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn chips(value: i64) -> Self {
        Self {
            chips: value,
            ..Self::default()
        }
    }

    pub fn mult(value: f64) -> Self {
        Self {
            mult: value,
            ..Self::default()
        }
    }

    pub fn x_mult(value: f64) -> Self {
        Self {
            x_mult: value,
            ..Self::default()
        }
    }

    pub fn money(value: i64) -> Self {
        Self {
            money: value,
            ..Self::default()
        }
    }

    pub fn retrigger(count: u32) -> Self {
        Self {
            retriggers: count,
            ..Self::default()
        }
    }

    pub fn flag(flag: EffectFlag) -> Self {
        let mut delta = Self::default();
        delta.flags.insert(flag);
        delta
    }

    pub fn with_flag(mut self, flag: EffectFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn has(&self, flag: EffectFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_none(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(mut self, other: EffectDelta) -> Self {
        self.chips += other.chips;
        self.mult += other.mult;
        self.x_mult *= other.x_mult;
        self.money += other.money;
        self.retriggers += other.retriggers;
        self.hands += other.hands;
        self.discards += other.discards;
        self.hand_size += other.hand_size;
        self.sell_value += other.sell_value;
        self.flags.extend(other.flags);
        self
    }
}

impl FromIterator<EffectDelta> for EffectDelta {
    fn from_iter<I: IntoIterator<Item = EffectDelta>>(iter: I) -> Self {
        iter.into_iter().fold(EffectDelta::none(), EffectDelta::merge)
    }
}

/// A card produced by an effect, to be added to the deck by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardCopy {
    pub source_id: u32,
    pub card: Card,
}
