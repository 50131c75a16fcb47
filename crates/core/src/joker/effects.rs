use super::{JokerContext, JokerKind};
use crate::{
    default_rank_chips, BlindKind, Card, EffectDelta, EffectFlag, JokerInstance, JokerState,
    RandomSource, Rank, Suit,
};

pub(super) fn scored(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    card: &Card,
    position: usize,
    rng: &mut dyn RandomSource,
) -> EffectDelta {
    let smeared = ctx.rules.smeared_suits;
    let face = card.is_face(ctx.rules.all_face);
    let rank = card.effective_rank();
    match kind {
        JokerKind::GreedyJoker => suit_mult(card, Suit::Diamonds, smeared, 3.0),
        JokerKind::LustyJoker => suit_mult(card, Suit::Hearts, smeared, 3.0),
        JokerKind::WrathfulJoker => suit_mult(card, Suit::Spades, smeared, 3.0),
        JokerKind::GluttonousJoker => suit_mult(card, Suit::Clubs, smeared, 3.0),
        JokerKind::OnyxAgate => suit_mult(card, Suit::Clubs, smeared, 7.0),
        JokerKind::Arrowhead if card.has_suit(Suit::Spades, smeared) => EffectDelta::chips(50),
        JokerKind::ScaryFace if face => EffectDelta::chips(30),
        JokerKind::SmileyFace if face => EffectDelta::mult(5.0),
        JokerKind::Fibonacci if rank.is_some_and(Rank::is_fibonacci) => EffectDelta::mult(8.0),
        JokerKind::EvenSteven if rank.is_some_and(Rank::is_even) => EffectDelta::mult(4.0),
        JokerKind::OddTodd if rank.is_some_and(Rank::is_odd) => EffectDelta::chips(31),
        JokerKind::Scholar if rank == Some(Rank::Ace) => EffectDelta {
            chips: 20,
            mult: 4.0,
            ..EffectDelta::default()
        },
        JokerKind::Bloodstone if card.has_suit(Suit::Hearts, smeared) && rng.one_in(2) => {
            EffectDelta::x_mult(1.5)
        }
        JokerKind::BusinessCard if face && rng.one_in(2) => EffectDelta::money(2),
        JokerKind::Photograph => {
            let first_face = ctx
                .scoring
                .iter()
                .position(|c| c.is_face(ctx.rules.all_face));
            if first_face == Some(position) {
                EffectDelta::x_mult(2.0)
            } else {
                EffectDelta::none()
            }
        }
        JokerKind::Hack
            if matches!(rank, Some(Rank::Two | Rank::Three | Rank::Four | Rank::Five)) =>
        {
            EffectDelta::retrigger(1)
        }
        JokerKind::SockAndBuskin if face => EffectDelta::retrigger(1),
        JokerKind::Dusk if ctx.snapshot.hands == 1 => EffectDelta::retrigger(1),
        _ => EffectDelta::none(),
    }
}

fn suit_mult(card: &Card, suit: Suit, smeared: bool, mult: f64) -> EffectDelta {
    if card.has_suit(suit, smeared) {
        EffectDelta::mult(mult)
    } else {
        EffectDelta::none()
    }
}

pub(super) fn held(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    card: &Card,
    position: usize,
) -> EffectDelta {
    match kind {
        JokerKind::Baron if card.effective_rank() == Some(Rank::King) => EffectDelta::x_mult(1.5),
        JokerKind::ShootTheMoon if card.effective_rank() == Some(Rank::Queen) => {
            EffectDelta::mult(13.0)
        }
        JokerKind::RaisedFist => {
            let lowest = ctx
                .held
                .iter()
                .enumerate()
                .filter_map(|(idx, c)| c.effective_rank().map(|rank| (idx, rank)))
                .min_by_key(|(_, rank)| rank.value())
                .map(|(idx, _)| idx);
            match (lowest, card.effective_rank()) {
                (Some(idx), Some(rank)) if idx == position => {
                    EffectDelta::mult(2.0 * default_rank_chips(rank) as f64)
                }
                _ => EffectDelta::none(),
            }
        }
        JokerKind::Mime => EffectDelta::retrigger(1),
        _ => EffectDelta::none(),
    }
}

pub(super) fn discard(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    cards: &[Card],
    state: &mut JokerState,
) -> EffectDelta {
    let first_discard = ctx.round.discards_used == 0;
    match kind {
        JokerKind::FacelessJoker => {
            let faces = cards
                .iter()
                .filter(|c| c.is_face(ctx.rules.all_face))
                .count();
            if faces >= 3 {
                EffectDelta::money(5)
            } else {
                EffectDelta::none()
            }
        }
        JokerKind::TradingCard if first_discard && cards.len() == 1 => {
            EffectDelta::money(3).with_flag(EffectFlag::DestroyCard)
        }
        JokerKind::MailInRebate => {
            let target = state.get_or("rank", 14.0) as u8;
            let hits = cards
                .iter()
                .filter(|c| c.effective_rank().map(Rank::value) == Some(target))
                .count() as i64;
            EffectDelta::money(5 * hits)
        }
        _ => EffectDelta::none(),
    }
}

pub(super) fn play(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    state: &mut JokerState,
    rng: &mut dyn RandomSource,
) -> EffectDelta {
    match kind {
        JokerKind::RideTheBus => {
            if ctx.scoring.iter().any(|c| c.is_face(ctx.rules.all_face)) {
                state.set("mult", 0.0);
            } else {
                state.add("mult", 1.0);
            }
            EffectDelta::none()
        }
        JokerKind::SpaceJoker if rng.one_in(4) => EffectDelta::flag(EffectFlag::UpgradePlayedHand),
        JokerKind::Dna if ctx.round.hands_played == 0 && ctx.played.len() == 1 => {
            EffectDelta::flag(EffectFlag::CopyCardToDeck)
        }
        _ => EffectDelta::none(),
    }
}

pub(super) fn independent(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    rng: &mut dyn RandomSource,
) -> EffectDelta {
    let snapshot = ctx.snapshot;
    let deck = ctx.deck;
    match kind {
        JokerKind::Joker => EffectDelta::mult(4.0),
        JokerKind::JollyJoker if ctx.hand_kind.contains_pair() => EffectDelta::mult(8.0),
        JokerKind::ZanyJoker if ctx.hand_kind.contains_three() => EffectDelta::mult(12.0),
        JokerKind::SlyJoker if ctx.hand_kind.contains_pair() => EffectDelta::chips(50),
        JokerKind::WilyJoker if ctx.hand_kind.contains_three() => EffectDelta::chips(100),
        JokerKind::HalfJoker if ctx.played.len() <= 3 => EffectDelta::mult(20.0),
        JokerKind::Banner => EffectDelta::chips(30 * snapshot.discards as i64),
        JokerKind::MysticSummit if snapshot.discards == 0 => EffectDelta::mult(15.0),
        JokerKind::Misprint => EffectDelta::mult(rng.range_inclusive(0, 23) as f64),
        JokerKind::AbstractJoker => EffectDelta::mult(3.0 * ctx.slot.joker_count as f64),
        JokerKind::BlueJoker => EffectDelta::chips(2 * deck.remaining as i64),
        JokerKind::Bull => EffectDelta::chips(2 * snapshot.money.max(0)),
        JokerKind::Bootstraps => EffectDelta::mult(2.0 * (snapshot.money.max(0) / 5) as f64),
        JokerKind::Erosion => {
            let missing = deck.starting_size.saturating_sub(deck.full_size);
            EffectDelta::mult(4.0 * missing as f64)
        }
        JokerKind::SteelJoker => EffectDelta::x_mult(1.0 + 0.2 * deck.steel_cards as f64),
        JokerKind::StoneJoker => EffectDelta::chips(25 * deck.stone_cards as i64),
        JokerKind::Supernova => EffectDelta::mult(ctx.times_played as f64),
        JokerKind::CardSharp if ctx.played_this_round => EffectDelta::x_mult(3.0),
        JokerKind::Acrobat if snapshot.hands == 1 => EffectDelta::x_mult(3.0),
        JokerKind::Cavendish => EffectDelta::x_mult(3.0),
        JokerKind::Swashbuckler => EffectDelta::mult(ctx.slot.others_sell_value as f64),
        _ => EffectDelta::none(),
    }
}

pub(super) fn hand_played(kind: JokerKind, state: &mut JokerState) -> EffectDelta {
    match kind {
        JokerKind::IceCream => {
            if state.add("chips", -5.0) <= 0.0 {
                EffectDelta::flag(EffectFlag::DestroySelf)
            } else {
                EffectDelta::none()
            }
        }
        _ => EffectDelta::none(),
    }
}

pub(super) fn reroll(kind: JokerKind, state: &mut JokerState) -> EffectDelta {
    if kind == JokerKind::FlashCard {
        state.add("mult", 2.0);
    }
    EffectDelta::none()
}

pub(super) fn blind_select(
    kind: JokerKind,
    ctx: &JokerContext<'_>,
    _blind: BlindKind,
) -> EffectDelta {
    match kind {
        JokerKind::Burglar => EffectDelta {
            hands: 3,
            discards: -(ctx.snapshot.discards as i32),
            ..EffectDelta::default()
        },
        JokerKind::MarbleJoker => EffectDelta::flag(EffectFlag::AddStoneCard),
        _ => EffectDelta::none(),
    }
}

pub(super) fn end_of_round(
    kind: JokerKind,
    state: &mut JokerState,
    rng: &mut dyn RandomSource,
) -> EffectDelta {
    match kind {
        JokerKind::GoldenJoker => EffectDelta::money(4),
        JokerKind::Rocket => EffectDelta::money(state.get_or("payout", 1.0) as i64),
        JokerKind::Egg => {
            state.add("sell_bonus", 3.0);
            EffectDelta {
                sell_value: 3,
                ..EffectDelta::default()
            }
        }
        JokerKind::Popcorn => {
            if state.add("mult", -4.0) <= 0.0 {
                EffectDelta::flag(EffectFlag::DestroySelf)
            } else {
                EffectDelta::none()
            }
        }
        JokerKind::GrosMichel if rng.one_in(6) => EffectDelta::flag(EffectFlag::DestroySelf),
        _ => EffectDelta::none(),
    }
}

/// State upkeep every instance gets at round end, whatever its trigger.
pub(super) fn round_upkeep(
    kind: JokerKind,
    state: &mut JokerState,
    boss_cleared: bool,
    rng: &mut dyn RandomSource,
) {
    match kind {
        JokerKind::Rocket if boss_cleared => {
            state.add("payout", 2.0);
        }
        JokerKind::Campfire if boss_cleared => state.set("x_mult", 1.0),
        JokerKind::MailInRebate => {
            let rank = rng
                .pick_index(Rank::ALL.len())
                .map_or(Rank::Ace, |idx| Rank::ALL[idx]);
            state.set("rank", f64::from(rank.value()));
        }
        _ => {}
    }
}

pub(super) fn card_added(kind: JokerKind, _card: &Card, state: &mut JokerState) -> EffectDelta {
    if kind == JokerKind::Hologram {
        state.add("x_mult", 0.25);
    }
    EffectDelta::none()
}

pub(super) fn shop_exit(kind: JokerKind) -> EffectDelta {
    match kind {
        JokerKind::Perkeo => EffectDelta::flag(EffectFlag::CopyConsumable),
        _ => EffectDelta::none(),
    }
}

pub(super) fn sell(
    kind: JokerKind,
    _sold: &JokerInstance,
    by_self: bool,
    state: &mut JokerState,
) -> EffectDelta {
    match kind {
        JokerKind::Luchador if by_self => EffectDelta::flag(EffectFlag::DisableBoss),
        JokerKind::Campfire if !by_self => {
            state.add("x_mult", 0.25);
            EffectDelta::none()
        }
        _ => EffectDelta::none(),
    }
}
