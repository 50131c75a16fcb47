use crate::{
    Card, CardAttrRules, CardCopy, DeferredEffect, GameConfig, HandKind, HandLevelState, Rank,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScoreTables {
    hand_rules: HashMap<HandKind, (i64, f64)>,
    hand_level_rules: HashMap<HandKind, (i64, f64)>,
    rank_chips: HashMap<Rank, i64>,
    pub card_attrs: CardAttrRules,
}

impl ScoreTables {
    pub fn from_config(config: &GameConfig) -> Self {
        let mut hand_rules = HashMap::new();
        let mut hand_level_rules = HashMap::new();
        for hand in &config.hands {
            hand_rules.insert(hand.kind, (hand.base_chips, hand.base_mult));
            hand_level_rules.insert(hand.kind, (hand.level_chips, hand.level_mult));
        }
        let mut rank_chips = HashMap::new();
        for rank in &config.ranks {
            rank_chips.insert(rank.rank, rank.chips);
        }
        Self {
            hand_rules,
            hand_level_rules,
            rank_chips,
            card_attrs: config.card_attrs.clone(),
        }
    }

    pub fn hand_base(&self, kind: HandKind) -> (i64, f64) {
        self.hand_rules.get(&kind).copied().unwrap_or((0, 1.0))
    }

    pub fn hand_base_for_level(&self, kind: HandKind, level: u32) -> (i64, f64) {
        let (base_chips, base_mult) = self.hand_base(kind);
        let (level_chips, level_mult) = self
            .hand_level_rules
            .get(&kind)
            .copied()
            .unwrap_or((0, 0.0));
        if level <= 1 {
            return (base_chips, base_mult);
        }
        let extra = (level - 1) as i64;
        let chips = base_chips.saturating_add(level_chips.saturating_mul(extra));
        let mult = base_mult + level_mult * extra as f64;
        (chips, mult)
    }

    pub fn hand_base_from_levels(
        &self,
        kind: HandKind,
        levels: &HandLevelState,
        reduction: u32,
    ) -> (i64, f64) {
        self.hand_base_for_level(kind, levels.effective_level(kind, reduction))
    }

    /// Chip value of a scored card before modifiers; stone cards have a fixed
    /// value regardless of rank.
    pub fn card_chips(&self, card: &Card) -> i64 {
        if card.is_stone() {
            return self.card_attrs.stone_chips;
        }
        self.rank_chips.get(&card.rank).copied().unwrap_or(0)
    }
}

/// Itemised contribution of one scoring-card trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardScoreDetail {
    pub card: Option<Card>,
    /// 0 for the first pass, then 1.. for retriggers.
    pub trigger: u32,
    pub disabled: bool,
    pub chips: i64,
    pub mult: f64,
    pub x_mult: f64,
    pub money: i64,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub hand_kind: HandKind,
    pub base_chips: i64,
    pub base_multiplier: f64,
    pub chip_bonus: i64,
    pub mult_bonus: f64,
    pub mult_multiplier: f64,
    pub held_mult_multiplier: f64,
    pub money_bonus: i64,
    pub destroyed_cards: Vec<Card>,
    pub scoring_cards: Vec<Card>,
    pub card_details: Vec<CardScoreDetail>,
    pub total_chips: i64,
    pub total_multiplier: f64,
    pub total_score: i64,
    #[serde(default)]
    pub copied_to_deck: Vec<CardCopy>,
    #[serde(default)]
    pub destroyed_jokers: Vec<u32>,
    #[serde(default)]
    pub deferred: Vec<DeferredEffect>,
    #[serde(default)]
    pub hand_level_ups: Vec<HandKind>,
}

impl ScoreResult {
    pub fn empty(hand_kind: HandKind) -> Self {
        Self {
            hand_kind,
            base_chips: 0,
            base_multiplier: 0.0,
            chip_bonus: 0,
            mult_bonus: 0.0,
            mult_multiplier: 1.0,
            held_mult_multiplier: 1.0,
            money_bonus: 0,
            destroyed_cards: Vec::new(),
            scoring_cards: Vec::new(),
            card_details: Vec::new(),
            total_chips: 0,
            total_multiplier: 0.0,
            total_score: 0,
            copied_to_deck: Vec::new(),
            destroyed_jokers: Vec::new(),
            deferred: Vec::new(),
            hand_level_ups: Vec::new(),
        }
    }

    /// Compute the three totals from the accumulated fields.
    pub fn finalize(&mut self) {
        self.total_chips = self.base_chips + self.chip_bonus;
        let multiplier = (self.base_multiplier + self.mult_bonus)
            * self.mult_multiplier
            * self.held_mult_multiplier;
        self.total_multiplier = multiplier.max(0.0);
        self.total_score = (self.total_chips as f64 * self.total_multiplier).floor() as i64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enhancement, Suit};

    #[test]
    fn level_scaling_adds_per_level_increments() {
        let tables = ScoreTables::from_config(&GameConfig::standard());
        assert_eq!(tables.hand_base_for_level(HandKind::OnePair, 1), (10, 2.0));
        assert_eq!(tables.hand_base_for_level(HandKind::OnePair, 3), (40, 4.0));
        assert_eq!(tables.hand_base_for_level(HandKind::HighCard, 0), (5, 1.0));
    }

    #[test]
    fn stone_cards_use_flat_chips() {
        let tables = ScoreTables::from_config(&GameConfig::standard());
        let stone = Card::standard(Suit::Clubs, Rank::Ace).with_enhancement(Enhancement::Stone);
        assert_eq!(tables.card_chips(&stone), 50);
        assert_eq!(tables.card_chips(&Card::standard(Suit::Clubs, Rank::Ace)), 11);
    }

    #[test]
    fn finalize_floors_the_product() {
        let mut result = ScoreResult::empty(HandKind::HighCard);
        result.base_chips = 15;
        result.chip_bonus = 2;
        result.base_multiplier = 1.0;
        result.mult_bonus = 0.5;
        result.mult_multiplier = 1.5;
        result.finalize();
        assert_eq!(result.total_chips, 17);
        assert_eq!(result.total_multiplier, 2.25);
        assert_eq!(result.total_score, 38);
    }
}
