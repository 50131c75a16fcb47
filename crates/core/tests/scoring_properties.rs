use ante_core::{
    evaluate_hand, BossState, Card, Edition, Enhancement, GameConfig, GameSnapshot, HandKind,
    HandLevelState, JokerEffectResolver, JokerKind, JokerSlots, ModifierPipeline, RandomSource,
    Rank, RngState, ScoreRequest, ScoreResult, ScoreTables, Seal, Suit,
};
use std::collections::VecDeque;

/// Replays a fixed sequence of draws, then keeps returning 1.
struct Scripted(VecDeque<u64>);

impl Scripted {
    fn new(values: &[u64]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl RandomSource for Scripted {
    fn next_u64(&mut self) -> u64 {
        self.0.pop_front().unwrap_or(1)
    }
}

fn c(suit: Suit, rank: Rank) -> Card {
    Card::standard(suit, rank)
}

fn snapshot() -> GameSnapshot {
    GameSnapshot {
        money: 10,
        interest_cap: 25,
        hands: 4,
        discards: 3,
    }
}

fn score_with(
    played: &[Card],
    held: &[Card],
    jokers: &mut JokerSlots,
    rng: &mut dyn RandomSource,
) -> ScoreResult {
    let tables = ScoreTables::from_config(&GameConfig::standard());
    let resolver = JokerEffectResolver::default();
    let pipeline = ModifierPipeline::new(&tables, &resolver);
    let request = ScoreRequest::new(played, held, snapshot());
    pipeline.evaluate(
        &request,
        &HandLevelState::new(),
        &BossState::new(),
        jokers,
        rng,
    )
}

fn slots(kinds: &[JokerKind]) -> JokerSlots {
    let mut slots = JokerSlots::new(5);
    for kind in kinds {
        slots.add(*kind).expect("slot");
    }
    slots
}

macro_rules! hand_case {
    ($name:ident, [$(($suit:ident, $rank:ident)),* $(,)?], $expected:expr) => {
        #[test]
        fn $name() {
            let cards = vec![$(c(Suit::$suit, Rank::$rank)),*];
            assert_eq!(evaluate_hand(&cards), $expected);
        }
    };
}

hand_case!(classify_high_card, [(Spades, Ace), (Hearts, Nine)], HandKind::HighCard);
hand_case!(classify_pair, [(Spades, Ace), (Hearts, Ace)], HandKind::OnePair);
hand_case!(
    classify_two_pair,
    [(Spades, Ace), (Hearts, Ace), (Clubs, Two), (Diamonds, Two)],
    HandKind::TwoPair
);
hand_case!(
    classify_wheel_straight,
    [(Spades, Ace), (Hearts, Two), (Clubs, Three), (Diamonds, Four), (Spades, Five)],
    HandKind::Straight
);
hand_case!(
    classify_full_house,
    [(Spades, King), (Hearts, King), (Clubs, King), (Diamonds, Four), (Spades, Four)],
    HandKind::FullHouse
);
hand_case!(
    classify_flush_five,
    [(Hearts, Seven), (Hearts, Seven), (Hearts, Seven), (Hearts, Seven), (Hearts, Seven)],
    HandKind::FlushFive
);

#[test]
fn pair_of_aces_with_bonus_card() {
    let played = [
        c(Suit::Spades, Rank::Ace).with_enhancement(Enhancement::Bonus),
        c(Suit::Hearts, Rank::Ace),
    ];
    let mut rng = RngState::from_seed(1);
    let result = score_with(&played, &[], &mut slots(&[]), &mut rng);
    assert_eq!(result.hand_kind.id(), "onePair");
    assert!(result.chip_bonus >= 30);
}

#[test]
fn wild_card_completes_a_flush() {
    let cards = [
        c(Suit::Hearts, Rank::Two),
        c(Suit::Hearts, Rank::Six),
        c(Suit::Hearts, Rank::Nine),
        c(Suit::Hearts, Rank::Jack),
        c(Suit::Spades, Rank::Four).with_enhancement(Enhancement::Wild),
    ];
    assert_eq!(evaluate_hand(&cards), HandKind::Flush);
}

macro_rules! formula_case {
    ($name:ident, $jokers:expr, [$($card:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let played = vec![$($card),*];
            let mut rng = RngState::from_seed(21);
            let result = score_with(&played, &[], &mut slots(&$jokers), &mut rng);
            let chips = result.base_chips + result.chip_bonus;
            let mult = (result.base_multiplier + result.mult_bonus)
                * result.mult_multiplier
                * result.held_mult_multiplier;
            assert_eq!(result.total_chips, chips);
            assert!((result.total_multiplier - mult).abs() < 1e-9);
            assert_eq!(result.total_score, (chips as f64 * mult).floor() as i64);
        }
    };
}

formula_case!(formula_plain_pair, [], [c(Suit::Spades, Rank::Ten), c(Suit::Clubs, Rank::Ten)]);
formula_case!(
    formula_with_jokers,
    [JokerKind::Joker, JokerKind::GreedyJoker, JokerKind::Cavendish],
    [c(Suit::Diamonds, Rank::Ten), c(Suit::Diamonds, Rank::Ten)]
);
formula_case!(
    formula_with_editions,
    [JokerKind::Scholar],
    [
        c(Suit::Spades, Rank::Ace).with_edition(Edition::Polychrome),
        c(Suit::Hearts, Rank::Ace).with_edition(Edition::Foil),
        c(Suit::Clubs, Rank::Ace).with_enhancement(Enhancement::Mult),
    ]
);

#[test]
fn red_seal_lucky_rerolls_each_trigger() {
    let played = [c(Suit::Spades, Rank::Nine)
        .with_enhancement(Enhancement::Lucky)
        .with_seal(Seal::Red)];
    // pass 0: mult hits, money misses; pass 1: both miss
    let mut rng = Scripted::new(&[0, 1, 1, 1]);
    let result = score_with(&played, &[], &mut slots(&[]), &mut rng);
    assert_eq!(result.card_details.len(), 2);
    assert_eq!(result.card_details[0].mult, 20.0);
    assert_eq!(result.card_details[1].mult, 0.0);
    assert_eq!(result.mult_bonus, 20.0);
    assert_eq!(result.money_bonus, 0);
}

#[test]
fn glass_destroy_roll_is_reported() {
    let played = [c(Suit::Spades, Rank::Nine).with_enhancement(Enhancement::Glass)];
    let mut rng = Scripted::new(&[0]);
    let result = score_with(&played, &[], &mut slots(&[]), &mut rng);
    assert_eq!(result.destroyed_cards.len(), 1);
    assert_eq!(result.mult_multiplier, 2.0);
}

#[test]
fn swapping_order_independent_jokers_keeps_score() {
    let played = [c(Suit::Hearts, Rank::King), c(Suit::Spades, Rank::King)];
    let held = [c(Suit::Clubs, Rank::King)];
    let mut rng = RngState::from_seed(2);
    let mut forward = slots(&[JokerKind::Joker, JokerKind::Baron, JokerKind::LustyJoker]);
    let mut backward = slots(&[JokerKind::LustyJoker, JokerKind::Baron, JokerKind::Joker]);
    let a = score_with(&played, &held, &mut forward, &mut rng);
    let b = score_with(&played, &held, &mut backward, &mut rng);
    assert_eq!(a.total_score, b.total_score);
}

#[test]
fn swapping_a_copy_joker_can_change_score() {
    let played = [c(Suit::Hearts, Rank::Two)];
    let mut rng = RngState::from_seed(2);
    let mut copies_joker = slots(&[JokerKind::Blueprint, JokerKind::Cavendish, JokerKind::Joker]);
    let mut copies_plain = slots(&[JokerKind::Blueprint, JokerKind::Joker, JokerKind::Cavendish]);
    let a = score_with(&played, &[], &mut copies_joker, &mut rng);
    let b = score_with(&played, &[], &mut copies_plain, &mut rng);
    assert_ne!(a.total_score, b.total_score);
}

#[test]
fn mutual_copies_terminate() {
    let played = [c(Suit::Hearts, Rank::Two)];
    let mut rng = RngState::from_seed(2);
    let mut jokers = slots(&[JokerKind::Blueprint, JokerKind::Brainstorm]);
    let result = score_with(&played, &[], &mut jokers, &mut rng);
    assert_eq!(result.mult_multiplier, 1.0);
    assert_eq!(result.mult_bonus, 0.0);
}

#[test]
fn preview_never_mutates_jokers() {
    let tables = ScoreTables::from_config(&GameConfig::standard());
    let resolver = JokerEffectResolver::default();
    let pipeline = ModifierPipeline::new(&tables, &resolver);
    let jokers = slots(&[JokerKind::RideTheBus, JokerKind::IceCream, JokerKind::Misprint]);
    let before = jokers.clone();
    let played = [c(Suit::Hearts, Rank::Two)];
    let request = ScoreRequest::new(&played, &[], snapshot());
    let first = pipeline.preview(&request, &HandLevelState::new(), &BossState::new(), &jokers);
    let second = pipeline.preview(&request, &HandLevelState::new(), &BossState::new(), &jokers);
    assert_eq!(jokers, before);
    assert_eq!(first, second);
}

#[test]
fn scaling_joker_applies_banked_mult() {
    let played = [c(Suit::Hearts, Rank::Two)];
    let mut rng = RngState::from_seed(2);
    let mut jokers = slots(&[JokerKind::RideTheBus]);
    let first = score_with(&played, &[], &mut jokers, &mut rng);
    let second = score_with(&played, &[], &mut jokers, &mut rng);
    assert_eq!(first.mult_bonus, 1.0);
    assert_eq!(second.mult_bonus, 2.0);
}

#[test]
fn hand_played_jokers_signal_destruction() {
    let played = [c(Suit::Hearts, Rank::Two)];
    let mut rng = RngState::from_seed(2);
    let mut jokers = slots(&[JokerKind::IceCream]);
    jokers.get_mut(0).expect("ice cream").state.set("chips", 5.0);
    let result = score_with(&played, &[], &mut jokers, &mut rng);
    assert_eq!(result.chip_bonus, 2 + 5);
    assert_eq!(result.destroyed_jokers.len(), 1);
}

#[test]
fn card_sharp_only_fires_on_a_repeated_kind() {
    let tables = ScoreTables::from_config(&GameConfig::standard());
    let resolver = JokerEffectResolver::default();
    let pipeline = ModifierPipeline::new(&tables, &resolver);
    let played = [c(Suit::Hearts, Rank::Two)];
    let mut request = ScoreRequest::new(&played, &[], snapshot());
    request.round.hands_played = 1;
    let mut jokers = slots(&[JokerKind::CardSharp]);
    let mut rng = RngState::from_seed(2);
    let levels = HandLevelState::new();
    let boss = BossState::new();

    let fresh = pipeline.evaluate(&request, &levels, &boss, &mut jokers, &mut rng);
    assert_eq!(fresh.mult_multiplier, 1.0);
    request.played_this_round = true;
    let repeat = pipeline.evaluate(&request, &levels, &boss, &mut jokers, &mut rng);
    assert_eq!(repeat.mult_multiplier, 3.0);
}
