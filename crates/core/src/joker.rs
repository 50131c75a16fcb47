use crate::{
    BlindKind, Card, DeckCounters, EffectDelta, GameSnapshot, HandEvalRules, HandKind,
    JokerInstance, JokerRarity, JokerState, RandomSource, RoundCounters, TriggerKind,
};
use serde::{Deserialize, Serialize};

mod effects;
mod resolver;

pub use resolver::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JokerKind {
    // independent
    Joker,
    JollyJoker,
    ZanyJoker,
    SlyJoker,
    WilyJoker,
    HalfJoker,
    Banner,
    MysticSummit,
    Misprint,
    AbstractJoker,
    BlueJoker,
    Bull,
    Bootstraps,
    Erosion,
    SteelJoker,
    StoneJoker,
    Supernova,
    CardSharp,
    Acrobat,
    Cavendish,
    Swashbuckler,
    // hand evaluation rules
    FourFingers,
    Shortcut,
    SmearedJoker,
    Pareidolia,
    Splash,
    // scored
    GreedyJoker,
    LustyJoker,
    WrathfulJoker,
    GluttonousJoker,
    Arrowhead,
    OnyxAgate,
    ScaryFace,
    SmileyFace,
    Fibonacci,
    EvenSteven,
    OddTodd,
    Scholar,
    Bloodstone,
    BusinessCard,
    Photograph,
    Hack,
    SockAndBuskin,
    Dusk,
    // held
    Baron,
    ShootTheMoon,
    RaisedFist,
    Mime,
    // play
    RideTheBus,
    SpaceJoker,
    Dna,
    // hand played
    IceCream,
    // discard
    FacelessJoker,
    TradingCard,
    MailInRebate,
    // reroll
    FlashCard,
    // blind select
    Burglar,
    MarbleJoker,
    // end of round
    GoldenJoker,
    Egg,
    Popcorn,
    GrosMichel,
    Rocket,
    // card added
    Hologram,
    // shop exit
    Perkeo,
    // sell
    Luchador,
    Campfire,
    // copy
    Blueprint,
    Brainstorm,
}

impl JokerKind {
    pub const ALL: [JokerKind; 69] = [
        JokerKind::Joker,
        JokerKind::JollyJoker,
        JokerKind::ZanyJoker,
        JokerKind::SlyJoker,
        JokerKind::WilyJoker,
        JokerKind::HalfJoker,
        JokerKind::Banner,
        JokerKind::MysticSummit,
        JokerKind::Misprint,
        JokerKind::AbstractJoker,
        JokerKind::BlueJoker,
        JokerKind::Bull,
        JokerKind::Bootstraps,
        JokerKind::Erosion,
        JokerKind::SteelJoker,
        JokerKind::StoneJoker,
        JokerKind::Supernova,
        JokerKind::CardSharp,
        JokerKind::Acrobat,
        JokerKind::Cavendish,
        JokerKind::Swashbuckler,
        JokerKind::FourFingers,
        JokerKind::Shortcut,
        JokerKind::SmearedJoker,
        JokerKind::Pareidolia,
        JokerKind::Splash,
        JokerKind::GreedyJoker,
        JokerKind::LustyJoker,
        JokerKind::WrathfulJoker,
        JokerKind::GluttonousJoker,
        JokerKind::Arrowhead,
        JokerKind::OnyxAgate,
        JokerKind::ScaryFace,
        JokerKind::SmileyFace,
        JokerKind::Fibonacci,
        JokerKind::EvenSteven,
        JokerKind::OddTodd,
        JokerKind::Scholar,
        JokerKind::Bloodstone,
        JokerKind::BusinessCard,
        JokerKind::Photograph,
        JokerKind::Hack,
        JokerKind::SockAndBuskin,
        JokerKind::Dusk,
        JokerKind::Baron,
        JokerKind::ShootTheMoon,
        JokerKind::RaisedFist,
        JokerKind::Mime,
        JokerKind::RideTheBus,
        JokerKind::SpaceJoker,
        JokerKind::Dna,
        JokerKind::IceCream,
        JokerKind::FacelessJoker,
        JokerKind::TradingCard,
        JokerKind::MailInRebate,
        JokerKind::FlashCard,
        JokerKind::Burglar,
        JokerKind::MarbleJoker,
        JokerKind::GoldenJoker,
        JokerKind::Egg,
        JokerKind::Popcorn,
        JokerKind::GrosMichel,
        JokerKind::Rocket,
        JokerKind::Hologram,
        JokerKind::Perkeo,
        JokerKind::Luchador,
        JokerKind::Campfire,
        JokerKind::Blueprint,
        JokerKind::Brainstorm,
    ];

    pub fn trigger(self) -> TriggerKind {
        use JokerKind::*;
        match self {
            Joker | JollyJoker | ZanyJoker | SlyJoker | WilyJoker | HalfJoker | Banner
            | MysticSummit | Misprint | AbstractJoker | BlueJoker | Bull | Bootstraps
            | Erosion | SteelJoker | StoneJoker | Supernova | CardSharp | Acrobat | Cavendish
            | Swashbuckler | FourFingers | Shortcut | SmearedJoker | Pareidolia | Splash
            | Blueprint | Brainstorm => TriggerKind::Independent,
            GreedyJoker | LustyJoker | WrathfulJoker | GluttonousJoker | Arrowhead | OnyxAgate
            | ScaryFace | SmileyFace | Fibonacci | EvenSteven | OddTodd | Scholar | Bloodstone
            | BusinessCard | Photograph | Hack | SockAndBuskin | Dusk => TriggerKind::Scored,
            Baron | ShootTheMoon | RaisedFist | Mime => TriggerKind::Held,
            RideTheBus | SpaceJoker | Dna => TriggerKind::Play,
            IceCream => TriggerKind::HandPlayed,
            FacelessJoker | TradingCard | MailInRebate => TriggerKind::Discard,
            FlashCard => TriggerKind::Reroll,
            Burglar | MarbleJoker => TriggerKind::BlindSelect,
            GoldenJoker | Egg | Popcorn | GrosMichel | Rocket => TriggerKind::EndOfRound,
            Hologram => TriggerKind::CardAdded,
            Perkeo => TriggerKind::ShopExit,
            Luchador | Campfire => TriggerKind::Sell,
        }
    }

    pub fn rarity(self) -> JokerRarity {
        use JokerKind::*;
        match self {
            Perkeo => JokerRarity::Legendary,
            Blueprint | Brainstorm | Baron | Acrobat | Dna | Campfire | Bloodstone | Hack
            | SockAndBuskin | Dusk | CardSharp | Burglar | SteelJoker | Hologram
            | ShootTheMoon | FourFingers | Shortcut | SmearedJoker | Pareidolia | Mime
            | Cavendish | Rocket | RideTheBus | Bootstraps | Erosion | OnyxAgate | Arrowhead
            | TradingCard | Luchador | FlashCard | MarbleJoker | Supernova | StoneJoker
            | Swashbuckler | BlueJoker | Bull => JokerRarity::Uncommon,
            _ => JokerRarity::Common,
        }
    }

    pub fn cost(self) -> i64 {
        match self.rarity() {
            JokerRarity::Common => 4,
            JokerRarity::Uncommon => 6,
            JokerRarity::Rare => 8,
            JokerRarity::Legendary => 20,
        }
    }

    /// Effects that draw from the random source; skipped by previews.
    pub fn is_probabilistic(self) -> bool {
        matches!(
            self,
            JokerKind::Misprint
                | JokerKind::Bloodstone
                | JokerKind::BusinessCard
                | JokerKind::SpaceJoker
                | JokerKind::GrosMichel
        )
    }

    /// Effects whose result depends on slot order.
    pub fn is_position_dependent(self) -> bool {
        self.is_copier()
    }

    pub fn is_copier(self) -> bool {
        matches!(self, JokerKind::Blueprint | JokerKind::Brainstorm)
    }

    /// Seed a fresh instance's state bag.
    pub fn init_state(self, state: &mut JokerState) {
        match self {
            JokerKind::IceCream => state.set("chips", 100.0),
            JokerKind::Popcorn => state.set("mult", 20.0),
            JokerKind::GrosMichel => state.set("mult", 15.0),
            JokerKind::Hologram | JokerKind::Campfire => state.set("x_mult", 1.0),
            JokerKind::Rocket => state.set("payout", 1.0),
            JokerKind::MailInRebate => state.set("rank", 14.0),
            _ => {}
        }
    }

    /// Round-end state changes: Rocket's payout grows and Campfire resets
    /// once a boss falls, Mail-In Rebate picks its next rank.
    pub fn round_upkeep(
        self,
        state: &mut JokerState,
        boss_cleared: bool,
        rng: &mut dyn RandomSource,
    ) {
        effects::round_upkeep(self, state, boss_cleared, rng);
    }

    pub fn apply_rules(self, rules: &mut HandEvalRules) {
        match self {
            JokerKind::FourFingers => rules.four_fingers = true,
            JokerKind::Shortcut => rules.shortcut = true,
            JokerKind::SmearedJoker => rules.smeared_suits = true,
            JokerKind::Pareidolia => rules.all_face = true,
            JokerKind::Splash => rules.splash = true,
            _ => {}
        }
    }
}

/// Slot-derived facts, filled in per joker by the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotInfo {
    pub index: usize,
    pub joker_count: usize,
    pub others_sell_value: i64,
}

/// Read-only view of the hand and game handed to every effect.
#[derive(Debug, Clone, Copy)]
pub struct JokerContext<'a> {
    pub hand_kind: HandKind,
    pub played: &'a [Card],
    pub scoring: &'a [Card],
    pub held: &'a [Card],
    pub snapshot: GameSnapshot,
    pub deck: DeckCounters,
    pub round: RoundCounters,
    /// Times this hand kind has been played this run, including now.
    pub times_played: u32,
    /// This hand kind was already played earlier in the round.
    pub played_this_round: bool,
    pub most_played: Option<HandKind>,
    pub rules: HandEvalRules,
    pub slot: SlotInfo,
}

impl<'a> JokerContext<'a> {
    pub fn idle(snapshot: GameSnapshot) -> Self {
        Self {
            hand_kind: HandKind::HighCard,
            played: &[],
            scoring: &[],
            held: &[],
            snapshot,
            deck: DeckCounters::default(),
            round: RoundCounters::default(),
            times_played: 0,
            played_this_round: false,
            most_played: None,
            rules: HandEvalRules::default(),
            slot: SlotInfo::default(),
        }
    }

    pub fn at_slot(&self, slot: SlotInfo) -> Self {
        Self { slot, ..*self }
    }
}

/// Game events routed to jokers; each variant carries only what its
/// trigger kind needs.
#[derive(Debug, Clone, Copy)]
pub enum TriggerEvent<'a> {
    Scored { card: &'a Card, position: usize },
    Held { card: &'a Card, position: usize },
    Discard { cards: &'a [Card] },
    Play,
    Independent,
    HandPlayed,
    Reroll,
    BlindSelect { blind: BlindKind },
    EndOfRound,
    CardAdded { card: &'a Card },
    ShopExit,
    Sell { sold: &'a JokerInstance, by_self: bool },
}

impl TriggerEvent<'_> {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerEvent::Scored { .. } => TriggerKind::Scored,
            TriggerEvent::Held { .. } => TriggerKind::Held,
            TriggerEvent::Discard { .. } => TriggerKind::Discard,
            TriggerEvent::Play => TriggerKind::Play,
            TriggerEvent::Independent => TriggerKind::Independent,
            TriggerEvent::HandPlayed => TriggerKind::HandPlayed,
            TriggerEvent::Reroll => TriggerKind::Reroll,
            TriggerEvent::BlindSelect { .. } => TriggerKind::BlindSelect,
            TriggerEvent::EndOfRound => TriggerKind::EndOfRound,
            TriggerEvent::CardAdded { .. } => TriggerKind::CardAdded,
            TriggerEvent::ShopExit => TriggerKind::ShopExit,
            TriggerEvent::Sell { .. } => TriggerKind::Sell,
        }
    }
}

/// Run one archetype's effect for one event.
pub fn joker_effect(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    event: &TriggerEvent<'_>,
    state: &mut JokerState,
    rng: &mut dyn RandomSource,
) -> EffectDelta {
    match *event {
        TriggerEvent::Scored { card, position } => {
            effects::scored(kind, ctx, card, position, rng)
        }
        TriggerEvent::Held { card, position } => effects::held(kind, ctx, card, position),
        TriggerEvent::Discard { cards } => effects::discard(kind, ctx, cards, state),
        TriggerEvent::Play => effects::play(kind, ctx, state, rng),
        TriggerEvent::Independent => effects::independent(kind, ctx, rng),
        TriggerEvent::HandPlayed => effects::hand_played(kind, state),
        TriggerEvent::Reroll => effects::reroll(kind, state),
        TriggerEvent::BlindSelect { blind } => effects::blind_select(kind, ctx, blind),
        TriggerEvent::EndOfRound => effects::end_of_round(kind, state, rng),
        TriggerEvent::CardAdded { card } => effects::card_added(kind, card, state),
        TriggerEvent::ShopExit => effects::shop_exit(kind),
        TriggerEvent::Sell { sold, by_self } => effects::sell(kind, sold, by_self, state),
    }
}

/// Bonuses a scaling joker has banked in its state bag; read during the
/// independent pass whatever the joker's trigger kind.
pub fn stored_bonus(state: &JokerState) -> EffectDelta {
    EffectDelta {
        chips: state.get("chips").max(0.0) as i64,
        mult: state.get("mult"),
        x_mult: state.get_or("x_mult", 1.0),
        ..EffectDelta::default()
    }
}
