use super::{joker_effect, stored_bonus, JokerContext, JokerKind, SlotInfo, TriggerEvent};
use crate::{
    CardAttrRules, Edition, EffectDelta, EffectFlag, HandEvalRules, JokerInstance, JokerSlots,
    RandomSource, StickerRule, TriggerKind,
};
use tracing::{debug, trace};

/// Copy chains longer than this resolve to nothing.
pub const MAX_COPY_DEPTH: u32 = 8;

/// One joker's contribution to a dispatch, in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct JokerOutcome {
    pub joker_id: u32,
    pub index: usize,
    /// Archetype whose effect ran; differs from the slot's own kind for copies.
    pub source: JokerKind,
    pub delta: EffectDelta,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundEndReport {
    pub outcomes: Vec<JokerOutcome>,
    pub money: i64,
    pub rental_paid: i64,
    /// Instance ids that asked to be destroyed or whose perishable
    /// countdown ran out.
    pub destroyed: Vec<u32>,
}

/// Routes events to jokers by trigger kind and folds in the passive rules
/// every joker carries: editions, stored bonuses, stickers and copying.
#[derive(Debug, Clone)]
pub struct JokerEffectResolver {
    pub max_copy_depth: u32,
    foil_chips: i64,
    holographic_mult: f64,
    polychrome_x_mult: f64,
}

impl Default for JokerEffectResolver {
    fn default() -> Self {
        Self::new(&CardAttrRules::default())
    }
}

impl JokerEffectResolver {
    pub fn new(attrs: &CardAttrRules) -> Self {
        Self {
            max_copy_depth: MAX_COPY_DEPTH,
            foil_chips: attrs.foil_chips,
            holographic_mult: attrs.holographic_mult,
            polychrome_x_mult: attrs.polychrome_x_mult,
        }
    }

    /// Hand-evaluation switches granted by enabled rule jokers.
    pub fn hand_eval_rules(slots: &JokerSlots) -> HandEvalRules {
        let mut rules = HandEvalRules::default();
        for joker in slots.iter().filter(|joker| !joker.disabled) {
            joker.kind.apply_rules(&mut rules);
        }
        rules
    }

    pub fn can_sell(joker: &JokerInstance) -> bool {
        !joker.stickers.eternal
    }

    /// Slot whose effect the joker at `index` runs. Non-copiers run their
    /// own; copiers follow the chain until a non-copier or the depth guard.
    pub fn copy_target(&self, slots: &JokerSlots, index: usize) -> Option<usize> {
        let mut current = index;
        let mut depth = 0;
        loop {
            let joker = slots.get(current)?;
            let next = match joker.kind {
                JokerKind::Blueprint => current + 1,
                JokerKind::Brainstorm => 0,
                _ => return Some(current),
            };
            if depth >= self.max_copy_depth || next == current {
                debug!(
                    target: "ante::joker",
                    index,
                    depth,
                    "copy chain did not resolve"
                );
                return None;
            }
            current = next;
            depth += 1;
        }
    }

    /// Trigger kind the joker at `index` actually answers to.
    pub fn effective_trigger(&self, slots: &JokerSlots, index: usize) -> Option<TriggerKind> {
        let source = self.copy_target(slots, index)?;
        slots.get(source).map(|joker| joker.kind.trigger())
    }

    /// Deliver `event` to every enabled joker whose effective trigger matches,
    /// left to right. Probabilistic effects are skipped when previewing.
    pub fn dispatch(
        &self,
        slots: &mut JokerSlots,
        ctx: &JokerContext<'_>,
        event: &TriggerEvent<'_>,
        rng: &mut dyn RandomSource,
        preview: bool,
    ) -> Vec<JokerOutcome> {
        let trigger = event.kind();
        let mut outcomes = Vec::new();
        for index in 0..slots.len() {
            let Some((source, kind)) = self.routed(slots, index) else {
                continue;
            };
            if kind.trigger() != trigger || (preview && kind.is_probabilistic()) {
                continue;
            }
            let local = ctx.at_slot(slot_info(slots, index));
            let Some(delta) = self.run_effect(slots, index, source, kind, &local, event, rng)
            else {
                continue;
            };
            trace!(target: "ante::joker", index, ?kind, ?trigger, "joker fired");
            if let Some(joker) = slots.get(index) {
                outcomes.push(JokerOutcome {
                    joker_id: joker.id,
                    index,
                    source: kind,
                    delta,
                });
            }
        }
        outcomes
    }

    /// The independent pass: for every enabled joker, its edition's additive
    /// bonus, its banked bonus, its independent effect, then Polychrome.
    pub fn independent_pass(
        &self,
        slots: &mut JokerSlots,
        ctx: &JokerContext<'_>,
        rng: &mut dyn RandomSource,
        preview: bool,
    ) -> Vec<JokerOutcome> {
        let event = TriggerEvent::Independent;
        let mut outcomes = Vec::new();
        for index in 0..slots.len() {
            let Some(joker) = slots.get(index) else {
                continue;
            };
            if joker.disabled {
                continue;
            }
            let id = joker.id;
            let edition = joker.edition;
            let mut parts = vec![self.edition_before(edition)];
            let mut source_kind = joker.kind;
            if let Some((source, kind)) = self.routed(slots, index) {
                source_kind = kind;
                if let Some(source_joker) = slots.get(source) {
                    parts.push(stored_bonus(&source_joker.state));
                }
                if kind.trigger() == TriggerKind::Independent
                    && !(preview && kind.is_probabilistic())
                {
                    let local = ctx.at_slot(slot_info(slots, index));
                    if let Some(delta) =
                        self.run_effect(slots, index, source, kind, &local, &event, rng)
                    {
                        parts.push(delta);
                    }
                }
            }
            parts.push(self.edition_after(edition));
            let delta: EffectDelta = parts.into_iter().collect();
            if delta.is_none() {
                continue;
            }
            outcomes.push(JokerOutcome {
                joker_id: id,
                index,
                source: source_kind,
                delta,
            });
        }
        outcomes
    }

    /// End-of-round effects, per-kind state upkeep and sticker upkeep.
    pub fn end_of_round(
        &self,
        slots: &mut JokerSlots,
        ctx: &JokerContext<'_>,
        rng: &mut dyn RandomSource,
        stickers: &StickerRule,
        boss_cleared: bool,
    ) -> RoundEndReport {
        let outcomes = self.dispatch(slots, ctx, &TriggerEvent::EndOfRound, rng, false);
        let mut report = RoundEndReport::default();
        for outcome in &outcomes {
            report.money += outcome.delta.money;
            if outcome.delta.has(EffectFlag::DestroySelf) {
                report.destroyed.push(outcome.joker_id);
            }
        }
        for joker in slots.iter_mut() {
            joker.kind.round_upkeep(&mut joker.state, boss_cleared, rng);
            if joker.stickers.rental {
                report.rental_paid += stickers.rental_cost;
            }
            if joker.stickers.perishable {
                joker.stickers.perish_rounds_left =
                    joker.stickers.perish_rounds_left.saturating_sub(1);
                if joker.stickers.perish_rounds_left == 0 && !report.destroyed.contains(&joker.id)
                {
                    debug!(target: "ante::joker", id = joker.id, "perishable joker expired");
                    report.destroyed.push(joker.id);
                }
            }
        }
        let eternal: Vec<u32> = slots
            .iter()
            .filter(|joker| joker.stickers.eternal)
            .map(|joker| joker.id)
            .collect();
        report.destroyed.retain(|id| !eternal.contains(id));
        report.money -= report.rental_paid;
        report.outcomes = outcomes;
        report
    }

    fn routed(&self, slots: &JokerSlots, index: usize) -> Option<(usize, JokerKind)> {
        let joker = slots.get(index)?;
        if joker.disabled {
            return None;
        }
        let source = self.copy_target(slots, index)?;
        let target = slots.get(source)?;
        if target.disabled {
            return None;
        }
        Some((source, target.kind))
    }

    /// Copies run against a scratch clone of the target's state and may not
    /// destroy themselves on the target's behalf.
    #[allow(clippy::too_many_arguments)]
    fn run_effect(
        &self,
        slots: &mut JokerSlots,
        index: usize,
        source: usize,
        kind: JokerKind,
        ctx: &JokerContext<'_>,
        event: &TriggerEvent<'_>,
        rng: &mut dyn RandomSource,
    ) -> Option<EffectDelta> {
        if source == index {
            let joker = slots.get_mut(index)?;
            return Some(joker_effect(kind, ctx, event, &mut joker.state, rng));
        }
        let mut scratch = slots.get(source)?.state.clone();
        let mut delta = joker_effect(kind, ctx, event, &mut scratch, rng);
        delta.flags.remove(&EffectFlag::DestroySelf);
        Some(delta)
    }

    fn edition_before(&self, edition: Option<Edition>) -> EffectDelta {
        match edition {
            Some(Edition::Foil) => EffectDelta::chips(self.foil_chips),
            Some(Edition::Holographic) => EffectDelta::mult(self.holographic_mult),
            _ => EffectDelta::none(),
        }
    }

    fn edition_after(&self, edition: Option<Edition>) -> EffectDelta {
        match edition {
            Some(Edition::Polychrome) => EffectDelta::x_mult(self.polychrome_x_mult),
            _ => EffectDelta::none(),
        }
    }
}

fn slot_info(slots: &JokerSlots, index: usize) -> SlotInfo {
    let own = slots.get(index).map(JokerInstance::sell_value).unwrap_or(0);
    let total: i64 = slots.iter().map(JokerInstance::sell_value).sum();
    SlotInfo {
        index,
        joker_count: slots.len(),
        others_sell_value: total - own,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSnapshot, RngState};

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            money: 10,
            interest_cap: 25,
            hands: 4,
            discards: 3,
        }
    }

    #[test]
    fn blueprint_copies_right_neighbour() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::Blueprint).expect("blueprint");
        slots.add(JokerKind::Joker).expect("joker");
        let resolver = JokerEffectResolver::default();
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        let outcomes = resolver.independent_pass(&mut slots, &ctx, &mut rng, false);
        let total: EffectDelta = outcomes.into_iter().map(|o| o.delta).collect();
        assert_eq!(total.mult, 8.0);
    }

    #[test]
    fn mutual_copies_terminate_empty() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::Blueprint).expect("blueprint");
        slots.add(JokerKind::Brainstorm).expect("brainstorm");
        let resolver = JokerEffectResolver::default();
        assert_eq!(resolver.copy_target(&slots, 0), None);
        assert_eq!(resolver.copy_target(&slots, 1), None);
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        assert!(resolver
            .independent_pass(&mut slots, &ctx, &mut rng, false)
            .is_empty());
    }

    #[test]
    fn copy_does_not_destroy_itself() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::Blueprint).expect("blueprint");
        slots.add(JokerKind::IceCream).expect("ice cream");
        slots.get_mut(1).expect("ice").state.set("chips", 5.0);
        let resolver = JokerEffectResolver::default();
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        let outcomes =
            resolver.dispatch(&mut slots, &ctx, &TriggerEvent::HandPlayed, &mut rng, false);
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].delta.has(EffectFlag::DestroySelf));
        assert!(outcomes[1].delta.has(EffectFlag::DestroySelf));
    }

    #[test]
    fn editions_apply_even_without_independent_effect() {
        let mut slots = JokerSlots::new(5);
        slots
            .add_with_edition(JokerKind::GreedyJoker, Some(Edition::Foil))
            .expect("foil");
        slots
            .add_with_edition(JokerKind::Baron, Some(Edition::Polychrome))
            .expect("poly");
        let resolver = JokerEffectResolver::default();
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        let total: EffectDelta = resolver
            .independent_pass(&mut slots, &ctx, &mut rng, false)
            .into_iter()
            .map(|o| o.delta)
            .collect();
        assert_eq!(total.chips, 50);
        assert_eq!(total.x_mult, 1.5);
    }

    #[test]
    fn disabled_jokers_are_skipped() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::Joker).expect("joker");
        slots.get_mut(0).expect("joker").disabled = true;
        let resolver = JokerEffectResolver::default();
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        assert!(resolver
            .independent_pass(&mut slots, &ctx, &mut rng, false)
            .is_empty());
    }

    #[test]
    fn perishable_expires_and_rental_charges() {
        let mut slots = JokerSlots::new(5);
        let id = slots.add(JokerKind::Joker).expect("joker");
        {
            let joker = slots.get_mut(0).expect("joker");
            joker.stickers.perishable = true;
            joker.stickers.perish_rounds_left = 2;
            joker.stickers.rental = true;
        }
        let resolver = JokerEffectResolver::default();
        let mut rng = RngState::from_seed(3);
        let ctx = JokerContext::idle(snapshot());
        let rules = StickerRule::default();
        let first = resolver.end_of_round(&mut slots, &ctx, &mut rng, &rules, false);
        assert!(first.destroyed.is_empty());
        assert_eq!(first.money, -3);
        let second = resolver.end_of_round(&mut slots, &ctx, &mut rng, &rules, false);
        assert_eq!(second.destroyed, vec![id]);
    }

    #[test]
    fn rule_jokers_switch_evaluation() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::FourFingers).expect("four fingers");
        slots.add(JokerKind::Pareidolia).expect("pareidolia");
        let rules = JokerEffectResolver::hand_eval_rules(&slots);
        assert!(rules.four_fingers);
        assert!(rules.all_face);
        assert!(!rules.shortcut);
    }
}
