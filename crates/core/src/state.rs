use crate::HandKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    BlindSelect,
    Play,
    Cleanup,
    Shop,
    /// Final ante cleared; no further actions are accepted.
    Won,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindKind {
    Small,
    Big,
    Boss,
}

/// Economy and resource view handed to the scoring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub money: i64,
    pub interest_cap: i64,
    /// Hands remaining, counting the one being played.
    pub hands: u32,
    pub discards: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCounters {
    pub remaining: usize,
    pub full_size: usize,
    pub starting_size: usize,
    pub steel_cards: usize,
    pub stone_cards: usize,
}

impl DeckCounters {
    pub fn standard() -> Self {
        Self {
            remaining: 52,
            full_size: 52,
            starting_size: 52,
            steel_cards: 0,
            stone_cards: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCounters {
    pub hands_played: u32,
    pub discards_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub ante: u32,
    pub blind: BlindKind,
    pub phase: Phase,
    pub target: i64,
    pub blind_score: i64,
    pub hands_left: u32,
    pub discards_left: u32,
    pub hand_size: usize,
    pub money: i64,
    pub interest_cap: i64,
    #[serde(default)]
    pub round: RoundCounters,
    #[serde(default)]
    pub deck: DeckCounters,
    /// Run-wide per-hand-type play history.
    #[serde(default)]
    pub hand_play_counts: BTreeMap<HandKind, u32>,
    #[serde(default)]
    pub last_hand: Option<HandKind>,
    #[serde(default)]
    pub has_boss_reroll_voucher: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            ante: 1,
            blind: BlindKind::Small,
            phase: Phase::Setup,
            target: 0,
            blind_score: 0,
            hands_left: 0,
            discards_left: 0,
            hand_size: 8,
            money: 4,
            interest_cap: 25,
            round: RoundCounters::default(),
            deck: DeckCounters::standard(),
            hand_play_counts: BTreeMap::new(),
            last_hand: None,
            has_boss_reroll_voucher: false,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            money: self.money,
            interest_cap: self.interest_cap,
            hands: self.hands_left,
            discards: self.discards_left,
        }
    }

    pub fn times_played(&self, kind: HandKind) -> u32 {
        self.hand_play_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Most played hand; ties go to the higher-ranked hand.
    pub fn most_played_hand(&self) -> Option<HandKind> {
        self.hand_play_counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
            .map(|(kind, _)| *kind)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
