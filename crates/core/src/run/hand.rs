use super::*;
use crate::*;
use tracing::debug;

impl RunState {
    /// Deal up to hand size and run the boss's per-hand hook.
    pub fn start_hand(&mut self, events: &mut EventBus) -> Result<usize, RunError> {
        self.require_phase(Phase::Play)?;
        if self.state.hands_left == 0 {
            return Err(RunError::NoHandsLeft);
        }
        let needed = self.state.hand_size.saturating_sub(self.hand.len());
        let drawn = self.draw_cards(needed);
        self.boss
            .on_hand_start(&mut self.jokers, &self.hand, &mut self.rng);
        events.push(Event::HandDealt { count: drawn });
        Ok(drawn)
    }

    pub fn play_hand(
        &mut self,
        indices: &[usize],
        events: &mut EventBus,
    ) -> Result<ScoreResult, RunError> {
        self.require_phase(Phase::Play)?;
        if self.state.hands_left == 0 {
            return Err(RunError::NoHandsLeft);
        }
        let selected = self.selected_cards(indices)?;
        let rules = JokerEffectResolver::hand_eval_rules(&self.jokers);
        let kind = classify_hand(&selected, rules).kind;
        self.boss.can_play_hand(kind, &selected)?;

        let played = take_cards(&mut self.hand, indices);
        let most_played = self.state.most_played_hand();
        let played_this_round = self.boss.played_hand_types.contains(&kind);
        *self.state.hand_play_counts.entry(kind).or_insert(0) += 1;
        self.boss.before_play_hand(kind, most_played);

        let in_play: Vec<Card> = self.hand.iter().chain(&played).copied().collect();
        let request = ScoreRequest {
            played: &played,
            hand_kind: Some(kind),
            snapshot: self.state.snapshot(),
            held: &self.hand,
            deck: self.deck.counters(&in_play),
            round: self.state.round,
            most_played,
            times_played: self.state.times_played(kind),
            played_this_round,
            preview: false,
        };
        let pipeline = ModifierPipeline::new(&self.tables, &self.resolver);
        let result = pipeline.evaluate(
            &request,
            &self.levels,
            &self.boss,
            &mut self.jokers,
            &mut self.rng,
        );

        self.state.blind_score += result.total_score;
        self.state.money += result.money_bonus;
        self.state.last_hand = Some(kind);
        self.state.hands_left -= 1;
        self.state.round.hands_played += 1;

        let destroyed: Vec<u32> = result.destroyed_cards.iter().map(|card| card.id).collect();
        if !destroyed.is_empty() {
            events.push(Event::CardsDestroyed {
                ids: destroyed.clone(),
            });
        }
        self.deck.discard(
            played
                .iter()
                .copied()
                .filter(|card| !destroyed.contains(&card.id)),
        );
        for copy in &result.copied_to_deck {
            self.add_card(copy.card, events);
        }
        for &hand in &result.hand_level_ups {
            self.levels.upgrade(hand, 1);
            events.push(Event::HandLeveled {
                hand,
                level: self.levels.level(hand),
            });
        }
        self.remove_jokers(&result.destroyed_jokers, events);
        self.pending.extend(result.deferred.iter().copied());

        let aftermath =
            self.boss
                .after_play_hand(kind, &played, &self.hand, &self.levels, &mut self.rng);
        if !aftermath.discard_held.is_empty() {
            let dropped = take_cards(&mut self.hand, &aftermath.discard_held);
            events.push(Event::CardsDiscarded {
                count: dropped.len(),
                by_boss: true,
            });
            self.deck.discard(dropped);
        }
        self.state.money += aftermath.money_delta;
        if let Some(money) = aftermath.money_set {
            self.state.money = money;
        }

        events.push(Event::HandScored {
            hand: kind,
            chips: result.total_chips,
            mult: result.total_multiplier,
            total: result.total_score,
        });

        if self.blind_cleared() {
            self.state.phase = Phase::Cleanup;
        } else if self.state.hands_left == 0 {
            events.push(Event::BlindFailed {
                score: self.state.blind_score,
            });
            self.state.phase = Phase::Setup;
        } else {
            self.refill_after_action();
        }
        Ok(result)
    }

    /// Score the selection as it would play now, changing nothing.
    pub fn preview_hand(&self, indices: &[usize]) -> Result<ScoreResult, RunError> {
        self.require_phase(Phase::Play)?;
        let selected = self.selected_cards(indices)?;
        let held: Vec<Card> = self
            .hand
            .iter()
            .enumerate()
            .filter(|(idx, _)| !indices.contains(idx))
            .map(|(_, card)| *card)
            .collect();
        let mut request = ScoreRequest::new(&selected, &held, self.state.snapshot());
        request.deck = self.deck.counters(&self.hand);
        request.round = self.state.round;
        request.most_played = self.state.most_played_hand();
        let rules = JokerEffectResolver::hand_eval_rules(&self.jokers);
        let kind = classify_hand(&selected, rules).kind;
        request.times_played = self.state.times_played(kind) + 1;
        request.played_this_round = self.boss.played_hand_types.contains(&kind);
        let pipeline = ModifierPipeline::new(&self.tables, &self.resolver);
        Ok(pipeline.preview(&request, &self.levels, &self.boss, &self.jokers))
    }

    pub fn discard(&mut self, indices: &[usize], events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Play)?;
        if self.state.discards_left == 0 {
            return Err(RunError::NoDiscardsLeft);
        }
        self.selected_cards(indices)?;
        let mut discarded = take_cards(&mut self.hand, indices);

        let mut ctx = self.idle_context();
        ctx.held = &self.hand;
        let outcomes = self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::Discard { cards: &discarded },
            &mut self.rng,
            false,
        );
        let delta: EffectDelta = outcomes.into_iter().map(|o| o.delta).collect();
        self.state.money += delta.money;
        if delta.has(EffectFlag::DestroyCard) && discarded.len() == 1 {
            let ids: Vec<u32> = discarded.drain(..).map(|card| card.id).collect();
            for id in &ids {
                self.deck.destroy(*id);
            }
            events.push(Event::CardsDestroyed { ids });
        }
        for card in &discarded {
            if card.seal == Some(Seal::Purple) {
                self.push_consumable(Consumable::Tarot);
            }
        }

        self.state.discards_left -= 1;
        self.state.round.discards_used += 1;
        events.push(Event::CardsDiscarded {
            count: indices.len(),
            by_boss: false,
        });
        self.deck.discard(discarded);
        self.refill_after_action();
        Ok(())
    }

    /// Cards at `indices`, validated but not removed.
    fn selected_cards(&self, indices: &[usize]) -> Result<Vec<Card>, RunError> {
        if indices.is_empty() || indices.len() > 5 {
            return Err(RunError::InvalidCardCount);
        }
        let mut seen = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx >= self.hand.len() || seen.contains(&idx) {
                return Err(RunError::InvalidSelection);
            }
            seen.push(idx);
        }
        Ok(indices.iter().map(|&idx| self.hand[idx]).collect())
    }

    fn refill_after_action(&mut self) {
        let needed = self.state.hand_size.saturating_sub(self.hand.len());
        let count = self.boss.draw_after_action(needed);
        self.draw_cards(count);
    }

    fn draw_cards(&mut self, count: usize) -> usize {
        let all_face = JokerEffectResolver::hand_eval_rules(&self.jokers).all_face;
        let mut drawn = self.deck.draw_cards(count);
        for card in &mut drawn {
            let face_down = self.boss.draw_face_down(card, all_face, &mut self.rng);
            card.face_down = face_down;
        }
        let total = drawn.len();
        if total < count {
            debug!(target: "ante::run", wanted = count, drawn = total, "draw pile ran dry");
        }
        self.hand.extend(drawn);
        total
    }
}

/// Remove the cards at `indices` from `hand`, keeping their selection order.
fn take_cards(hand: &mut Vec<Card>, indices: &[usize]) -> Vec<Card> {
    let taken: Vec<Card> = indices
        .iter()
        .filter_map(|&idx| hand.get(idx).copied())
        .collect();
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    for idx in sorted {
        if idx < hand.len() {
            hand.remove(idx);
        }
    }
    taken
}
