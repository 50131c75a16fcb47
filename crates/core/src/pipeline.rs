use crate::{
    classify_hand, scoring_cards, BossState, Card, CardCopy, CardScoreDetail, DeckCounters,
    DeferredEffect, EffectDelta, EffectFlag, Enhancement, Edition, GameSnapshot, HandEvalRules,
    HandKind, HandLevelState, JokerContext, JokerEffectResolver, JokerOutcome, JokerSlots,
    RandomSource, RoundCounters, ScoreResult, ScoreTables, Seal, SlotInfo, TriggerEvent,
};
use tracing::debug;

/// Everything the pipeline reads about the hand being scored.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    pub played: &'a [Card],
    /// Pre-classified hand kind; the classifier runs when absent.
    pub hand_kind: Option<HandKind>,
    pub snapshot: GameSnapshot,
    pub held: &'a [Card],
    pub deck: DeckCounters,
    pub round: RoundCounters,
    pub most_played: Option<HandKind>,
    /// Times the hand kind has been played this run, including this hand.
    pub times_played: u32,
    /// The hand kind was already played earlier this round.
    pub played_this_round: bool,
    pub preview: bool,
}

impl<'a> ScoreRequest<'a> {
    pub fn new(played: &'a [Card], held: &'a [Card], snapshot: GameSnapshot) -> Self {
        Self {
            played,
            hand_kind: None,
            snapshot,
            held,
            deck: DeckCounters::standard(),
            round: RoundCounters::default(),
            most_played: None,
            times_played: 1,
            played_this_round: false,
            preview: false,
        }
    }
}

/// Composes hand base, per-card modifiers, jokers and the boss into one
/// itemised [`ScoreResult`].
#[derive(Debug, Clone, Copy)]
pub struct ModifierPipeline<'a> {
    tables: &'a ScoreTables,
    resolver: &'a JokerEffectResolver,
}

impl<'a> ModifierPipeline<'a> {
    pub fn new(tables: &'a ScoreTables, resolver: &'a JokerEffectResolver) -> Self {
        Self { tables, resolver }
    }

    /// Score without touching anything: jokers are cloned, probabilistic
    /// jokers are skipped and card-level rolls never fire.
    pub fn preview(
        &self,
        request: &ScoreRequest<'_>,
        levels: &HandLevelState,
        boss: &BossState,
        jokers: &JokerSlots,
    ) -> ScoreResult {
        let mut scratch = jokers.clone();
        let request = ScoreRequest {
            preview: true,
            ..*request
        };
        self.evaluate(&request, levels, boss, &mut scratch, &mut NoRolls)
    }

    pub fn evaluate(
        &self,
        request: &ScoreRequest<'_>,
        levels: &HandLevelState,
        boss: &BossState,
        jokers: &mut JokerSlots,
        rng: &mut dyn RandomSource,
    ) -> ScoreResult {
        let rules = JokerEffectResolver::hand_eval_rules(jokers);
        let evaluation = classify_hand(request.played, rules);
        let kind = request.hand_kind.unwrap_or(evaluation.kind);
        let indices = if kind == evaluation.kind {
            evaluation.scoring_indices
        } else {
            scoring_cards(request.played, kind, rules)
        };
        let scoring: Vec<Card> = indices
            .iter()
            .filter_map(|&idx| request.played.get(idx).copied())
            .collect();

        let mut result = ScoreResult::empty(kind);
        if scoring.is_empty() {
            return result;
        }
        result.scoring_cards = scoring.clone();

        let (base_chips, base_mult) = self.base(kind, levels, boss);
        result.base_chips = base_chips;
        result.base_multiplier = base_mult;

        let ctx = JokerContext {
            hand_kind: kind,
            played: request.played,
            scoring: &scoring,
            held: request.held,
            snapshot: request.snapshot,
            deck: request.deck,
            round: request.round,
            times_played: request.times_played,
            played_this_round: request.played_this_round,
            most_played: request.most_played,
            rules,
            slot: SlotInfo::default(),
        };
        let mut pass = Pass {
            request,
            ctx: &ctx,
            boss,
            rules,
            jokers,
            rng,
            result: &mut result,
        };

        let outcomes = self.resolver.dispatch(
            pass.jokers,
            &ctx,
            &TriggerEvent::Play,
            pass.rng,
            request.preview,
        );
        pass.absorb(outcomes, true);

        for (position, card) in scoring.iter().enumerate() {
            self.score_card(&mut pass, card, position);
        }
        for (position, card) in request.held.iter().enumerate() {
            self.hold_card(&mut pass, card, position);
        }

        let outcomes =
            self.resolver
                .independent_pass(pass.jokers, &ctx, pass.rng, request.preview);
        pass.absorb(outcomes, true);

        pass.result.finalize();

        let outcomes = self.resolver.dispatch(
            pass.jokers,
            &ctx,
            &TriggerEvent::HandPlayed,
            pass.rng,
            request.preview,
        );
        pass.absorb(outcomes, false);

        debug!(
            target: "ante::pipeline",
            hand = kind.id(),
            chips = result.total_chips,
            mult = result.total_multiplier,
            score = result.total_score,
            preview = request.preview,
            "hand scored"
        );
        result
    }

    /// Level-adjusted base, reduced by the boss and halved under the Flint.
    fn base(&self, kind: HandKind, levels: &HandLevelState, boss: &BossState) -> (i64, f64) {
        let reduction = boss.level_reduction(kind);
        let (chips, mult) = self.tables.hand_base_from_levels(kind, levels, reduction);
        if boss.halves_base() {
            (chips / 2, (mult / 2.0).floor().max(1.0))
        } else {
            (chips, mult)
        }
    }

    fn score_card(&self, pass: &mut Pass<'_, '_>, card: &Card, position: usize) {
        if pass.boss.is_card_disabled_with(card, pass.rules.all_face) {
            pass.result.card_details.push(CardScoreDetail {
                card: Some(*card),
                disabled: true,
                x_mult: 1.0,
                ..CardScoreDetail::default()
            });
            return;
        }
        let mut passes = 1;
        let mut trigger = 0;
        while trigger < passes {
            let (mut delta, destroyed) = self.card_modifiers(pass, card);
            if card.seal == Some(Seal::Gold) {
                delta.money += self.tables.card_attrs.gold_seal_money;
            }
            let event = TriggerEvent::Scored { card, position };
            let outcomes = self.resolver.dispatch(
                pass.jokers,
                pass.ctx,
                &event,
                pass.rng,
                pass.request.preview,
            );
            let jokers: EffectDelta = outcomes.iter().map(|o| o.delta.clone()).collect();
            if trigger == 0 {
                passes += jokers.retriggers;
                if card.seal == Some(Seal::Red) {
                    passes += 1;
                }
            }
            pass.absorb(outcomes, true);
            pass.add(&delta);
            if destroyed && !pass.result.destroyed_cards.iter().any(|c| c.id == card.id) {
                pass.result.destroyed_cards.push(*card);
            }
            let merged = delta.merge(jokers);
            pass.result.card_details.push(CardScoreDetail {
                card: Some(*card),
                trigger,
                disabled: false,
                chips: merged.chips,
                mult: merged.mult,
                x_mult: merged.x_mult,
                money: merged.money,
                destroyed,
            });
            trigger += 1;
        }
    }

    /// Rank chips, enhancement then edition for one trigger of one card.
    /// Each call rolls the card's chances afresh.
    fn card_modifiers(&self, pass: &mut Pass<'_, '_>, card: &Card) -> (EffectDelta, bool) {
        let attrs = &self.tables.card_attrs;
        let preview = pass.request.preview;
        let mut delta = EffectDelta::chips(self.tables.card_chips(card));
        let mut destroyed = false;
        match card.enhancement {
            Some(Enhancement::Bonus) => delta.chips += attrs.bonus_chips,
            Some(Enhancement::Mult) => delta.mult += attrs.mult_add,
            Some(Enhancement::Glass) => {
                delta.x_mult *= attrs.glass_x_mult;
                destroyed = !preview && pass.rng.one_in(attrs.glass_destroy_odds);
            }
            Some(Enhancement::Lucky) if !preview => {
                if pass.rng.one_in(attrs.lucky_mult_odds) {
                    delta.mult += attrs.lucky_mult;
                }
                if pass.rng.one_in(attrs.lucky_money_odds) {
                    delta.money += attrs.lucky_money;
                }
            }
            _ => {}
        }
        match card.edition {
            Some(Edition::Foil) => delta.chips += attrs.foil_chips,
            Some(Edition::Holographic) => delta.mult += attrs.holographic_mult,
            Some(Edition::Polychrome) => delta.x_mult *= attrs.polychrome_x_mult,
            _ => {}
        }
        (delta, destroyed)
    }

    fn hold_card(&self, pass: &mut Pass<'_, '_>, card: &Card, position: usize) {
        if pass.boss.is_card_disabled_with(card, pass.rules.all_face) {
            return;
        }
        let attrs = &self.tables.card_attrs;
        let mut passes = 1;
        let mut trigger = 0;
        while trigger < passes {
            if card.enhancement == Some(Enhancement::Steel) {
                pass.result.held_mult_multiplier *= attrs.steel_x_mult;
            }
            let event = TriggerEvent::Held { card, position };
            let outcomes = self.resolver.dispatch(
                pass.jokers,
                pass.ctx,
                &event,
                pass.rng,
                pass.request.preview,
            );
            if trigger == 0 {
                passes += outcomes.iter().map(|o| o.delta.retriggers).sum::<u32>();
                if card.seal == Some(Seal::Red) {
                    passes += 1;
                }
            }
            pass.absorb(outcomes, true);
            trigger += 1;
        }
    }
}

/// Mutable borrows shared by every step of one evaluation.
struct Pass<'p, 'c> {
    request: &'p ScoreRequest<'c>,
    ctx: &'p JokerContext<'p>,
    boss: &'p BossState,
    rules: HandEvalRules,
    jokers: &'p mut JokerSlots,
    rng: &'p mut dyn RandomSource,
    result: &'p mut ScoreResult,
}

impl Pass<'_, '_> {
    fn add(&mut self, delta: &EffectDelta) {
        self.result.chip_bonus += delta.chips;
        self.result.mult_bonus += delta.mult;
        self.result.mult_multiplier *= delta.x_mult;
        self.result.money_bonus += delta.money;
    }

    /// Fold joker outcomes into the result; score fields only while the
    /// hand is still being scored.
    fn absorb(&mut self, outcomes: Vec<JokerOutcome>, scoring: bool) {
        for outcome in outcomes {
            let delta = outcome.delta;
            if scoring {
                self.add(&delta);
            } else {
                self.result.money_bonus += delta.money;
            }
            for flag in &delta.flags {
                match flag {
                    EffectFlag::DestroySelf => {
                        if !self.result.destroyed_jokers.contains(&outcome.joker_id) {
                            debug!(
                                target: "ante::pipeline",
                                joker = outcome.joker_id,
                                "joker destroyed itself"
                            );
                            self.result.destroyed_jokers.push(outcome.joker_id);
                        }
                    }
                    EffectFlag::UpgradePlayedHand => {
                        self.result.hand_level_ups.push(self.result.hand_kind)
                    }
                    EffectFlag::CopyCardToDeck => {
                        if let Some(card) = self.request.played.first() {
                            self.result.copied_to_deck.push(CardCopy {
                                source_id: card.id,
                                card: *card,
                            });
                        }
                    }
                    EffectFlag::CreatePlanet => {
                        self.result.deferred.push(DeferredEffect::PlanetForHand)
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Randomness for previews: no chance ever succeeds.
struct NoRolls;

impl RandomSource for NoRolls {
    fn next_u64(&mut self) -> u64 {
        0
    }

    fn one_in(&mut self, _odds: u32) -> bool {
        false
    }
}
