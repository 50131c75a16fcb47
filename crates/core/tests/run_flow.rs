use ante_core::{
    BlindKind, BossKind, Card, ConfigError, Consumable, Enhancement, Event, EventBus, GameConfig,
    HandKind, JokerKind, JokerStickers, Phase, PlayRejected, Rank, RunError, RunSnapshot,
    RunState, Seal, SlotError, Suit,
};

fn run_in_play(seed: u64) -> (RunState, EventBus) {
    let mut run = RunState::new(GameConfig::standard(), seed).unwrap();
    let mut events = EventBus::default();
    run.start_ante(1, &mut events).unwrap();
    run.select_blind(BlindKind::Small, &mut events).unwrap();
    run.start_hand(&mut events).unwrap();
    (run, events)
}

fn force_clear(run: &mut RunState) {
    run.state.target = 1;
    run.state.blind_score = 1;
    run.state.phase = Phase::Cleanup;
}

#[test]
fn first_hand_scores_and_spends_a_hand() {
    let (mut run, mut events) = run_in_play(42);
    assert_eq!(run.hand.len(), 8);
    let hands = run.state.hands_left;
    let result = run.play_hand(&[0, 1], &mut events).unwrap();
    assert!(result.total_score > 0);
    assert_eq!(run.state.blind_score, result.total_score);
    assert_eq!(run.state.hands_left, hands - 1);
    assert_eq!(run.hand.len(), 8);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::HandScored { total, .. } if total == result.total_score)));
}

#[test]
fn preview_leaves_the_run_untouched() {
    let (run, _) = run_in_play(7);
    let before = run.snapshot();
    let preview = run.preview_hand(&[0]).unwrap();
    assert!(preview.total_score > 0);
    assert_eq!(run.snapshot(), before);
}

#[test]
fn blinds_must_be_taken_in_order() {
    let mut run = RunState::new(GameConfig::standard(), 1).unwrap();
    let mut events = EventBus::default();
    run.start_ante(1, &mut events).unwrap();
    let err = run.select_blind(BlindKind::Boss, &mut events).unwrap_err();
    assert!(matches!(
        err,
        RunError::WrongBlind {
            expected: BlindKind::Small,
            got: BlindKind::Boss
        }
    ));
}

#[test]
fn rejected_hand_changes_nothing() {
    let (mut run, mut events) = run_in_play(3);
    run.boss.set_boss(BossKind::Psychic);
    let before = run.snapshot();
    let err = run.play_hand(&[0, 1], &mut events).unwrap_err();
    assert!(matches!(
        err,
        RunError::Rejected(PlayRejected::RequiresFiveCards(2))
    ));
    assert_eq!(run.snapshot(), before);
}

#[test]
fn selection_is_validated() {
    let (mut run, mut events) = run_in_play(3);
    assert!(matches!(
        run.play_hand(&[], &mut events),
        Err(RunError::InvalidCardCount)
    ));
    assert!(matches!(
        run.play_hand(&[0, 0], &mut events),
        Err(RunError::InvalidSelection)
    ));
    assert!(matches!(
        run.play_hand(&[99], &mut events),
        Err(RunError::InvalidSelection)
    ));
}

#[test]
fn discard_refills_and_spends_a_discard() {
    let (mut run, mut events) = run_in_play(5);
    let discards = run.state.discards_left;
    run.discard(&[0, 1, 2], &mut events).unwrap();
    assert_eq!(run.hand.len(), 8);
    assert_eq!(run.state.discards_left, discards - 1);
}

#[test]
fn eternal_jokers_cannot_be_sold() {
    let (mut run, mut events) = run_in_play(8);
    let stickers = JokerStickers {
        eternal: true,
        ..JokerStickers::default()
    };
    run.add_joker(JokerKind::Joker, None, stickers, &mut events)
        .unwrap();
    let err = run.sell_joker(0, &mut events).unwrap_err();
    assert!(matches!(err, RunError::Slots(SlotError::Eternal)));
    assert_eq!(run.jokers.len(), 1);
}

#[test]
fn selling_luchador_disables_the_boss() {
    let (mut run, mut events) = run_in_play(8);
    run.boss.set_boss(BossKind::Psychic);
    run.add_joker(JokerKind::Luchador, None, JokerStickers::default(), &mut events)
        .unwrap();
    let money = run.state.money;
    let value = run.sell_joker(0, &mut events).unwrap();
    assert_eq!(run.state.money, money + value);
    assert_eq!(run.boss.active(), None);
    assert!(events.drain().any(|event| event == Event::BossDisabled));
    run.play_hand(&[0], &mut events).unwrap();
}

#[test]
fn cleared_blind_pays_out_and_opens_the_shop() {
    let (mut run, mut events) = run_in_play(12);
    force_clear(&mut run);
    let money = run.state.money;
    let reward = run.end_round(&mut events).unwrap();
    assert!(reward > 0);
    assert_eq!(run.state.money, money + reward);
    assert_eq!(run.state.phase, Phase::Shop);
    assert_eq!(run.state.blind, BlindKind::Big);

    run.exit_shop(&mut events).unwrap();
    assert_eq!(run.state.phase, Phase::BlindSelect);
    run.select_blind(BlindKind::Big, &mut events).unwrap();
    assert_eq!(run.state.phase, Phase::Play);
}

#[test]
fn uncleared_blind_cannot_end() {
    let (mut run, mut events) = run_in_play(12);
    run.state.phase = Phase::Cleanup;
    assert!(matches!(
        run.end_round(&mut events),
        Err(RunError::BlindNotCleared)
    ));
}

#[test]
fn boss_blind_uses_the_assigned_boss() {
    let mut run = RunState::new(GameConfig::standard(), 21).unwrap();
    let mut events = EventBus::default();
    let boss = run.start_ante(1, &mut events).unwrap();
    run.state.blind = BlindKind::Boss;
    run.select_blind(BlindKind::Boss, &mut events).unwrap();
    assert_eq!(run.boss.current_boss, Some(boss));
    let base = run.config.base_target(1).unwrap();
    assert_eq!(
        run.state.target,
        run.boss.modify_target_score(base, &run.config).unwrap()
    );
    assert_eq!(run.state.hand_size, run.boss.modify_hand_size(run.config.hand_size));
}

#[test]
fn perishable_joker_expires() {
    let (mut run, mut events) = run_in_play(30);
    let stickers = JokerStickers {
        perishable: true,
        ..JokerStickers::default()
    };
    let id = run
        .add_joker(JokerKind::Joker, None, stickers, &mut events)
        .unwrap();
    let rounds = run.config.stickers.perishable_rounds;
    for _ in 0..rounds {
        assert_eq!(run.jokers.len(), 1);
        force_clear(&mut run);
        run.end_round(&mut events).unwrap();
    }
    assert!(run.jokers.is_empty());
    assert!(events
        .drain()
        .any(|event| event == Event::JokerDestroyed { id }));
}

#[test]
fn snapshot_round_trips_through_json() {
    let (mut run, mut events) = run_in_play(99);
    run.add_joker(JokerKind::RideTheBus, None, JokerStickers::default(), &mut events)
        .unwrap();
    run.play_hand(&[0], &mut events).unwrap();

    let json = serde_json::to_string(&run.snapshot()).unwrap();
    let saved: RunSnapshot = serde_json::from_str(&json).unwrap();
    let mut restored = RunState::new(GameConfig::standard(), 0).unwrap();
    restored.restore(saved);
    assert_eq!(restored.snapshot().state, run.snapshot().state);
    assert_eq!(restored.jokers, run.jokers);
    assert_eq!(restored.hand, run.hand);
    assert_eq!(restored.boss, run.boss);
    assert_eq!(restored.selection, run.selection);
}

#[test]
fn held_gold_and_blue_seal_pay_once_per_round() {
    let (mut run, mut events) = run_in_play(12);
    run.state.target = 1_000_000;
    let last = run.hand.len() - 1;
    let id = run.hand[last].id;
    run.hand[last] = run.hand[last]
        .with_enhancement(Enhancement::Gold)
        .with_seal(Seal::Blue);
    for _ in 0..3 {
        run.play_hand(&[0], &mut events).unwrap();
    }
    assert!(run.hand.iter().any(|card| card.id == id));

    force_clear(&mut run);
    run.state.money = 0;
    let reward = run.end_round(&mut events).unwrap();
    let gold = run.config.card_attrs.gold_money_held;
    assert_eq!(run.state.money, reward + gold);
    assert_eq!(run.consumables, vec![Consumable::Planet(HandKind::HighCard)]);
}

#[test]
fn card_sharp_waits_for_a_repeated_hand_kind() {
    let (mut run, mut events) = run_in_play(17);
    run.state.target = 1_000_000;
    run.add_joker(JokerKind::CardSharp, None, JokerStickers::default(), &mut events)
        .unwrap();
    run.hand[0] = Card::standard(Suit::Hearts, Rank::King).with_id(run.hand[0].id);
    run.hand[1] = Card::standard(Suit::Spades, Rank::King).with_id(run.hand[1].id);

    let pair = run.play_hand(&[0, 1], &mut events).unwrap();
    assert_eq!(pair.hand_kind, HandKind::OnePair);
    assert_eq!(pair.mult_multiplier, 1.0);
    let first_high = run.play_hand(&[0], &mut events).unwrap();
    assert_eq!(first_high.hand_kind, HandKind::HighCard);
    assert_eq!(first_high.mult_multiplier, 1.0);
    let second_high = run.play_hand(&[0], &mut events).unwrap();
    assert_eq!(second_high.mult_multiplier, 3.0);
}

#[test]
fn clearing_the_last_boss_wins_the_run() {
    let mut run = RunState::new(GameConfig::standard(), 4).unwrap();
    let mut events = EventBus::default();
    let last = run.config.max_ante().unwrap();
    run.start_ante(last, &mut events).unwrap();
    run.state.blind = BlindKind::Boss;
    run.select_blind(BlindKind::Boss, &mut events).unwrap();
    force_clear(&mut run);
    run.end_round(&mut events).unwrap();

    assert_eq!(run.state.phase, Phase::Won);
    assert_eq!(run.state.ante, last);
    assert!(events
        .drain()
        .any(|event| event == Event::RunWon { ante: last }));
    assert!(matches!(
        run.exit_shop(&mut events),
        Err(RunError::InvalidPhase(Phase::Won))
    ));
}

#[test]
fn leaving_the_shop_into_a_missing_ante_changes_nothing() {
    let mut run = RunState::new(GameConfig::standard(), 4).unwrap();
    let mut events = EventBus::default();
    let last = run.config.max_ante().unwrap();
    run.start_ante(last, &mut events).unwrap();
    run.state.ante = last + 1;
    run.state.phase = Phase::Shop;
    let before = run.snapshot();

    let err = run.exit_shop(&mut events).unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::MissingAnte(ante)) if ante == last + 1
    ));
    assert_eq!(run.snapshot(), before);
    assert_eq!(run.state.phase, Phase::Shop);
}

#[test]
fn campfire_cools_down_after_a_boss() {
    let mut run = RunState::new(GameConfig::standard(), 21).unwrap();
    let mut events = EventBus::default();
    run.start_ante(1, &mut events).unwrap();
    run.state.blind = BlindKind::Boss;
    run.select_blind(BlindKind::Boss, &mut events).unwrap();
    run.add_joker(JokerKind::Campfire, None, JokerStickers::default(), &mut events)
        .unwrap();
    run.jokers.get_mut(0).unwrap().state.set("x_mult", 2.0);
    force_clear(&mut run);
    run.end_round(&mut events).unwrap();
    assert_eq!(run.jokers.get(0).unwrap().state.get("x_mult"), 1.0);
}
