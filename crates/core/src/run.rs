use crate::{
    BlindKind, BossSelectionState, BossState, Card, ConfigError, Deck, DeferredEffect,
    GameConfig, GameState, HandKind, HandLevelState, JokerEffectResolver, JokerSlots, Phase,
    PlayRejected, RngState, ScoreTables, SlotError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod blind;
mod hand;
mod joker;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("expected the {expected:?} blind, got {got:?}")]
    WrongBlind { expected: BlindKind, got: BlindKind },
    #[error("no boss assigned for this ante")]
    NoBossAssigned,
    #[error("boss reroll not available")]
    RerollNotAllowed,
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("invalid card count")]
    InvalidCardCount,
    #[error("not enough money")]
    NotEnoughMoney,
    #[error("blind not cleared")]
    BlindNotCleared,
    #[error("invalid consumable index {0}")]
    InvalidConsumable(usize),
    #[error("hand rejected: {0}")]
    Rejected(#[from] PlayRejected),
    #[error("joker slots: {0}")]
    Slots(#[from] SlotError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Consumables produced by jokers and seals; only planets are usable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    Planet(HandKind),
    Tarot,
}

/// Owns every piece of mutable game state and drives the boss and joker
/// hooks at each phase boundary.
#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub tables: ScoreTables,
    pub resolver: JokerEffectResolver,
    pub rng: RngState,
    pub deck: Deck,
    pub hand: Vec<Card>,
    pub state: GameState,
    pub levels: HandLevelState,
    pub jokers: JokerSlots,
    pub boss: BossState,
    pub selection: BossSelectionState,
    pub consumables: Vec<Consumable>,
    pending: Vec<DeferredEffect>,
}

/// Plain-data save of a run. The RNG restarts from `seed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub seed: u64,
    pub state: GameState,
    pub levels: HandLevelState,
    pub jokers: JokerSlots,
    pub boss: BossState,
    pub selection: BossSelectionState,
    pub deck: Deck,
    pub hand: Vec<Card>,
    pub consumables: Vec<Consumable>,
    #[serde(default)]
    pub pending: Vec<DeferredEffect>,
}

impl RunState {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, RunError> {
        config.validate()?;
        let mut rng = RngState::from_seed(seed);
        let mut deck = Deck::standard52();
        deck.shuffle(&mut rng);
        let mut state = GameState::new();
        state.hand_size = config.hand_size;
        Ok(Self {
            tables: ScoreTables::from_config(&config),
            resolver: JokerEffectResolver::new(&config.card_attrs),
            jokers: JokerSlots::new(config.joker_slots),
            config,
            rng,
            deck,
            hand: Vec::new(),
            state,
            levels: HandLevelState::new(),
            boss: BossState::new(),
            selection: BossSelectionState::new(),
            consumables: Vec::new(),
            pending: Vec::new(),
        })
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            seed: self.rng.seed(),
            state: self.state.clone(),
            levels: self.levels.get_state(),
            jokers: self.jokers.get_state(),
            boss: self.boss.get_state(),
            selection: self.selection.get_state(),
            deck: self.deck.clone(),
            hand: self.hand.clone(),
            consumables: self.consumables.clone(),
            pending: self.pending.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: RunSnapshot) {
        self.rng = RngState::from_seed(snapshot.seed);
        self.state = snapshot.state;
        self.levels.restore_state(snapshot.levels);
        self.jokers.restore_state(snapshot.jokers);
        self.boss.restore_state(snapshot.boss);
        self.selection.restore_state(snapshot.selection);
        self.deck = snapshot.deck;
        self.hand = snapshot.hand;
        self.consumables = snapshot.consumables;
        self.pending = snapshot.pending;
    }

    fn require_phase(&self, phase: Phase) -> Result<(), RunError> {
        if self.state.phase != phase {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        Ok(())
    }

    fn push_consumable(&mut self, consumable: Consumable) {
        if self.consumables.len() < self.config.economy.consumable_slots {
            self.consumables.push(consumable);
        }
    }
}
