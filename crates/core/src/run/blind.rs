use super::*;
use crate::*;
use tracing::info;

impl RunState {
    /// Enter `ante`: reset ante-scoped boss memory and assign its boss.
    /// Fails without touching the run when the ante has no rule or no boss
    /// can be drawn for it.
    pub fn start_ante(&mut self, ante: u32, events: &mut EventBus) -> Result<BossKind, RunError> {
        self.config.ante_rule(ante)?;
        let mut selection = self.selection.clone();
        selection.new_ante(ante);
        let boss = selection.select_boss(ante, &self.config, &mut self.rng)?;
        self.selection = selection;
        self.boss.on_new_ante();
        self.state.ante = ante;
        self.state.blind = BlindKind::Small;
        self.state.phase = Phase::BlindSelect;
        self.state.blind_score = 0;
        info!(target: "ante::run", ante, boss = ?boss, "ante started");
        events.push(Event::AnteStarted { ante });
        events.push(Event::BossSelected { ante, boss });
        Ok(boss)
    }

    pub fn select_blind(&mut self, blind: BlindKind, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::BlindSelect)?;
        if blind != self.state.blind {
            return Err(RunError::WrongBlind {
                expected: self.state.blind,
                got: blind,
            });
        }
        let rule = self.config.blind_rule(blind)?.clone();
        let base = self.config.base_target(self.state.ante)?;
        let target = if blind == BlindKind::Boss {
            let boss = self.selection.assigned.ok_or(RunError::NoBossAssigned)?;
            self.boss.set_boss(boss);
            self.boss.modify_target_score(base, &self.config)?
        } else {
            (base as f64 * rule.target_mult).floor() as i64
        };
        self.boss.on_round_start();

        self.state.target = target;
        self.state.blind_score = 0;
        self.state.hands_left = self.boss.modify_hands(rule.hands);
        self.state.discards_left = self.boss.modify_discards(rule.discards);
        self.state.hand_size = self.boss.modify_hand_size(self.config.hand_size);
        self.state.round = RoundCounters::default();
        self.state.last_hand = None;
        self.deck.discard(self.hand.drain(..));
        self.deck.reset(&mut self.rng);

        let ctx = self.idle_context();
        let outcomes = self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::BlindSelect { blind },
            &mut self.rng,
            false,
        );
        for outcome in outcomes {
            self.apply_resources(&outcome.delta);
            if outcome.delta.has(EffectFlag::AddStoneCard) {
                let suit = Suit::ALL[self.rng.pick_index(Suit::ALL.len()).unwrap_or(0)];
                let rank = Rank::ALL[self.rng.pick_index(Rank::ALL.len()).unwrap_or(0)];
                let stone = Card::standard(suit, rank).with_enhancement(Enhancement::Stone);
                self.add_card(stone, events);
            }
        }
        self.boss.on_blind_select(&mut self.jokers, &mut self.rng);
        self.state.phase = Phase::Play;
        events.push(Event::BlindStarted {
            ante: self.state.ante,
            blind,
            target,
            hands: self.state.hands_left,
            discards: self.state.discards_left,
        });
        Ok(())
    }

    pub fn reroll_boss(&mut self, events: &mut EventBus) -> Result<BossKind, RunError> {
        self.require_phase(Phase::BlindSelect)?;
        if !self
            .selection
            .can_reroll_boss(self.state.has_boss_reroll_voucher)
        {
            return Err(RunError::RerollNotAllowed);
        }
        let cost = self.config.economy.boss_reroll_cost;
        if self.state.money < cost {
            return Err(RunError::NotEnoughMoney);
        }
        let ante = self.state.ante;
        let boss = self.selection.reroll_boss(ante, &self.config, &mut self.rng)?;
        self.state.money -= cost;
        events.push(Event::BossRerolled {
            ante,
            boss,
            rerolls: self.selection.boss_reroll_count,
        });
        Ok(boss)
    }

    pub fn blind_cleared(&self) -> bool {
        self.state.target > 0 && self.state.blind_score >= self.state.target
    }

    /// Pay out a cleared blind, run end-of-round effects and open the shop.
    /// Returns the blind reward.
    pub fn end_round(&mut self, events: &mut EventBus) -> Result<i64, RunError> {
        self.require_phase(Phase::Cleanup)?;
        if !self.blind_cleared() {
            return Err(RunError::BlindNotCleared);
        }
        let last_hand = self.state.last_hand.unwrap_or(HandKind::HighCard);
        for effect in std::mem::take(&mut self.pending) {
            match effect {
                DeferredEffect::PlanetForHand => {
                    self.push_consumable(Consumable::Planet(last_hand));
                }
            }
        }
        self.pay_held_cards(last_hand);

        let boss_cleared = self.state.blind == BlindKind::Boss;
        let ctx = self.idle_context();
        let report = self.resolver.end_of_round(
            &mut self.jokers,
            &ctx,
            &mut self.rng,
            &self.config.stickers,
            boss_cleared,
        );
        self.state.money += report.money;
        self.remove_jokers(&report.destroyed, events);

        let reward = self.reward_for_clear()?;
        self.state.money += reward;
        events.push(Event::BlindCleared {
            score: self.state.blind_score,
            reward,
            money: self.state.money,
        });

        self.boss.on_round_end(&mut self.jokers);
        self.deck.discard(self.hand.drain(..));
        self.deck.reset(&mut self.rng);
        let final_ante = self.config.max_ante().is_some_and(|max| self.state.ante >= max);
        match self.state.blind {
            BlindKind::Small => self.state.blind = BlindKind::Big,
            BlindKind::Big => self.state.blind = BlindKind::Boss,
            BlindKind::Boss if final_ante => {
                let ante = self.state.ante;
                info!(target: "ante::run", ante, "run won");
                events.push(Event::RunWon { ante });
                self.state.phase = Phase::Won;
                return Ok(reward);
            }
            BlindKind::Boss => {
                self.state.blind = BlindKind::Small;
                self.state.ante += 1;
            }
        }
        self.state.phase = Phase::Shop;
        Ok(reward)
    }

    /// Cards still in hand when the round ends: Gold pays once, a Blue seal
    /// makes one planet for the last hand played.
    fn pay_held_cards(&mut self, last_hand: HandKind) {
        let all_face = JokerEffectResolver::hand_eval_rules(&self.jokers).all_face;
        let gold = self.config.card_attrs.gold_money_held;
        let mut planets = 0;
        for card in &self.hand {
            if self.boss.is_card_disabled_with(card, all_face) {
                continue;
            }
            if card.enhancement == Some(Enhancement::Gold) {
                self.state.money += gold;
            }
            if card.seal == Some(Seal::Blue) {
                planets += 1;
            }
        }
        for _ in 0..planets {
            self.push_consumable(Consumable::Planet(last_hand));
        }
    }

    fn reward_for_clear(&self) -> Result<i64, RunError> {
        let economy = &self.config.economy;
        let base = match (self.state.blind, self.boss.current_boss) {
            (BlindKind::Boss, Some(boss)) => self.config.boss_rule(boss)?.reward,
            (blind, _) => self.config.blind_rule(blind)?.reward,
        };
        let hands = economy.per_hand_reward * self.state.hands_left as i64;
        Ok(base + hands + self.interest_earned())
    }

    fn interest_earned(&self) -> i64 {
        let economy = &self.config.economy;
        if economy.interest_step <= 0 {
            return 0;
        }
        let steps = (self.state.money / economy.interest_step).max(0);
        let cap_steps = self.state.interest_cap / economy.interest_step;
        steps.min(cap_steps) * economy.interest_per
    }

    pub(super) fn apply_resources(&mut self, delta: &EffectDelta) {
        let shift = |value: u32, by: i32| (value as i64 + by as i64).max(0) as u32;
        self.state.hands_left = shift(self.state.hands_left, delta.hands);
        self.state.discards_left = shift(self.state.discards_left, delta.discards);
        self.state.hand_size = (self.state.hand_size as i64 + delta.hand_size as i64).max(0) as usize;
        self.state.money += delta.money;
    }
}
