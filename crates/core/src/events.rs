use crate::{BlindKind, BossKind, HandKind, JokerKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    AnteStarted {
        ante: u32,
    },
    BossSelected {
        ante: u32,
        boss: BossKind,
    },
    BossRerolled {
        ante: u32,
        boss: BossKind,
        rerolls: u32,
    },
    BlindStarted {
        ante: u32,
        blind: BlindKind,
        target: i64,
        hands: u32,
        discards: u32,
    },
    HandDealt {
        count: usize,
    },
    HandScored {
        hand: HandKind,
        chips: i64,
        mult: f64,
        total: i64,
    },
    CardsDiscarded {
        count: usize,
        by_boss: bool,
    },
    CardsDestroyed {
        ids: Vec<u32>,
    },
    CardAdded {
        id: u32,
    },
    HandLeveled {
        hand: HandKind,
        level: u32,
    },
    JokerAdded {
        id: u32,
        kind: JokerKind,
    },
    JokerSold {
        id: u32,
        sell_value: i64,
        money: i64,
    },
    JokerDestroyed {
        id: u32,
    },
    BossDisabled,
    ShopRerolled {
        cost: i64,
        money: i64,
    },
    ShopExited,
    BlindCleared {
        score: i64,
        reward: i64,
        money: i64,
    },
    BlindFailed {
        score: i64,
    },
    /// The boss of the last configured ante was cleared.
    RunWon {
        ante: u32,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
