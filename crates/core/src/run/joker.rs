use super::*;
use crate::*;
use tracing::debug;

impl RunState {
    pub fn add_joker(
        &mut self,
        kind: JokerKind,
        edition: Option<Edition>,
        stickers: JokerStickers,
        events: &mut EventBus,
    ) -> Result<u32, RunError> {
        let id = self.jokers.add_with_edition(kind, edition)?;
        let perishable_rounds = self.config.stickers.perishable_rounds;
        if let Some(joker) = self
            .jokers
            .position_of(id)
            .and_then(|pos| self.jokers.get_mut(pos))
        {
            joker.stickers = stickers;
            if stickers.perishable && stickers.perish_rounds_left == 0 {
                joker.stickers.perish_rounds_left = perishable_rounds;
            }
        }
        events.push(Event::JokerAdded { id, kind });
        Ok(id)
    }

    /// Sell the joker at `index`. The sold joker sees its own sale first,
    /// then the remaining jokers see it.
    pub fn sell_joker(&mut self, index: usize, events: &mut EventBus) -> Result<i64, RunError> {
        let joker = self
            .jokers
            .get(index)
            .cloned()
            .ok_or(SlotError::InvalidIndex(index))?;
        if !JokerEffectResolver::can_sell(&joker) {
            return Err(SlotError::Eternal.into());
        }
        let ctx = self.idle_context();
        let mut own = EffectDelta::none();
        if !joker.disabled && joker.kind.trigger() == TriggerKind::Sell {
            let mut state = joker.state.clone();
            own = joker_effect(
                joker.kind,
                &ctx,
                &TriggerEvent::Sell {
                    sold: &joker,
                    by_self: true,
                },
                &mut state,
                &mut self.rng,
            );
        }
        let (sold, value) = self.jokers.sell(index)?;
        let outcomes = self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::Sell {
                sold: &sold,
                by_self: false,
            },
            &mut self.rng,
            false,
        );
        let delta = outcomes.into_iter().map(|o| o.delta).fold(own, EffectDelta::merge);
        if delta.has(EffectFlag::DisableBoss) {
            self.boss.disable_boss();
            events.push(Event::BossDisabled);
        }
        self.boss.on_joker_sold();
        self.state.money += value + delta.money;
        events.push(Event::JokerSold {
            id: sold.id,
            sell_value: value,
            money: self.state.money,
        });
        Ok(value)
    }

    pub fn reroll_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Shop)?;
        let cost = self.config.economy.shop_reroll_cost;
        if self.state.money < cost {
            return Err(RunError::NotEnoughMoney);
        }
        self.state.money -= cost;
        let ctx = self.idle_context();
        self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::Reroll,
            &mut self.rng,
            false,
        );
        events.push(Event::ShopRerolled {
            cost,
            money: self.state.money,
        });
        Ok(())
    }

    /// Leave the shop; entering a new ante assigns its boss. If that fails
    /// the run stays in the shop unchanged.
    pub fn exit_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_phase(Phase::Shop)?;
        if self.state.blind == BlindKind::Small && self.selection.current_ante != self.state.ante {
            self.start_ante(self.state.ante, events)?;
        }
        let ctx = self.idle_context();
        let outcomes = self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::ShopExit,
            &mut self.rng,
            false,
        );
        for outcome in outcomes {
            if outcome.delta.has(EffectFlag::CopyConsumable) {
                if let Some(first) = self.consumables.first().copied() {
                    self.push_consumable(first);
                }
            }
            if outcome.delta.has(EffectFlag::CreateTarot) {
                self.push_consumable(Consumable::Tarot);
            }
        }
        events.push(Event::ShopExited);
        self.state.phase = Phase::BlindSelect;
        Ok(())
    }

    /// Put a new card in the deck and let card-added jokers react.
    pub fn add_card(&mut self, card: Card, events: &mut EventBus) -> Card {
        let stored = self.deck.insert(card);
        let ctx = self.idle_context();
        self.resolver.dispatch(
            &mut self.jokers,
            &ctx,
            &TriggerEvent::CardAdded { card: &stored },
            &mut self.rng,
            false,
        );
        events.push(Event::CardAdded { id: stored.id });
        stored
    }

    /// Use the planet at `index`; returns the new level of its hand.
    pub fn use_planet(&mut self, index: usize, events: &mut EventBus) -> Result<u32, RunError> {
        let Some(Consumable::Planet(hand)) = self.consumables.get(index).copied() else {
            return Err(RunError::InvalidConsumable(index));
        };
        self.consumables.remove(index);
        self.levels.upgrade(hand, 1);
        let level = self.levels.level(hand);
        events.push(Event::HandLeveled { hand, level });
        Ok(level)
    }

    /// Destroy jokers by id; eternal jokers survive.
    pub(super) fn remove_jokers(&mut self, ids: &[u32], events: &mut EventBus) {
        let doomed: Vec<u32> = ids
            .iter()
            .copied()
            .filter(|id| {
                self.jokers
                    .position_of(*id)
                    .and_then(|pos| self.jokers.get(pos))
                    .is_some_and(|joker| !joker.stickers.eternal)
            })
            .collect();
        for joker in self.jokers.remove_ids(&doomed) {
            debug!(target: "ante::run", id = joker.id, kind = ?joker.kind, "joker destroyed");
            events.push(Event::JokerDestroyed { id: joker.id });
        }
    }

    /// Joker context outside of hand scoring.
    pub(super) fn idle_context<'a>(&self) -> JokerContext<'a> {
        JokerContext {
            deck: self.deck.counters(&self.hand),
            round: self.state.round,
            most_played: self.state.most_played_hand(),
            ..JokerContext::idle(self.state.snapshot())
        }
    }
}
