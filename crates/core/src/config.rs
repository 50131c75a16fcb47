use crate::{BlindKind, BossKind, HandKind, Rank};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing config for boss {0:?}")]
    MissingBoss(BossKind),
    #[error("missing config for hand {0:?}")]
    MissingHand(HandKind),
    #[error("missing chip value for rank {0:?}")]
    MissingRank(Rank),
    #[error("missing config for blind {0:?}")]
    MissingBlind(BlindKind),
    #[error("missing config for ante {0}")]
    MissingAnte(u32),
    #[error("invalid config for boss {0:?}: {1}")]
    InvalidBoss(BossKind, &'static str),
    #[error("no boss candidates for ante {ante}")]
    ExhaustedBossPool { ante: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRule {
    pub kind: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
    pub level_chips: i64,
    pub level_mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRule {
    pub rank: Rank,
    pub chips: i64,
}

/// Values for the three per-card modifier axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardAttrRules {
    pub bonus_chips: i64,
    pub mult_add: f64,
    pub glass_x_mult: f64,
    pub glass_destroy_odds: u32,
    pub steel_x_mult: f64,
    pub stone_chips: i64,
    pub gold_money_held: i64,
    pub lucky_mult_odds: u32,
    pub lucky_mult: f64,
    pub lucky_money_odds: u32,
    pub lucky_money: i64,
    pub foil_chips: i64,
    pub holographic_mult: f64,
    pub polychrome_x_mult: f64,
    pub gold_seal_money: i64,
}

impl Default for CardAttrRules {
    fn default() -> Self {
        Self {
            bonus_chips: 30,
            mult_add: 4.0,
            glass_x_mult: 2.0,
            glass_destroy_odds: 4,
            steel_x_mult: 1.5,
            stone_chips: 50,
            gold_money_held: 3,
            lucky_mult_odds: 5,
            lucky_mult: 20.0,
            lucky_money_odds: 15,
            lucky_money: 20,
            foil_chips: 50,
            holographic_mult: 10.0,
            polychrome_x_mult: 1.5,
            gold_seal_money: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossRule {
    pub kind: BossKind,
    pub name: String,
    pub description: String,
    pub min_ante: u32,
    pub score_multiplier: f64,
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlindRule {
    pub kind: BlindKind,
    pub target_mult: f64,
    pub reward: i64,
    pub hands: u32,
    pub discards: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnteRule {
    pub ante: u32,
    pub base_target: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickerRule {
    pub perishable_rounds: u32,
    pub rental_cost: i64,
}

impl Default for StickerRule {
    fn default() -> Self {
        Self {
            perishable_rounds: 5,
            rental_cost: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyRule {
    pub interest_step: i64,
    pub interest_per: i64,
    pub per_hand_reward: i64,
    pub shop_reroll_cost: i64,
    pub boss_reroll_cost: i64,
    pub consumable_slots: usize,
}

impl Default for EconomyRule {
    fn default() -> Self {
        Self {
            interest_step: 5,
            interest_per: 1,
            per_hand_reward: 1,
            shop_reroll_cost: 5,
            boss_reroll_cost: 10,
            consumable_slots: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub hands: Vec<HandRule>,
    pub ranks: Vec<RankRule>,
    pub card_attrs: CardAttrRules,
    pub bosses: Vec<BossRule>,
    pub blinds: Vec<BlindRule>,
    pub antes: Vec<AnteRule>,
    pub stickers: StickerRule,
    #[serde(default)]
    pub economy: EconomyRule,
    pub hand_size: usize,
    pub joker_slots: usize,
}

impl GameConfig {
    pub fn standard() -> Self {
        Self {
            hands: standard_hands(),
            ranks: Rank::ALL
                .iter()
                .map(|&rank| RankRule {
                    rank,
                    chips: default_rank_chips(rank),
                })
                .collect(),
            card_attrs: CardAttrRules::default(),
            bosses: standard_bosses(),
            blinds: vec![
                BlindRule {
                    kind: BlindKind::Small,
                    target_mult: 1.0,
                    reward: 3,
                    hands: 4,
                    discards: 3,
                },
                BlindRule {
                    kind: BlindKind::Big,
                    target_mult: 1.5,
                    reward: 4,
                    hands: 4,
                    discards: 3,
                },
                BlindRule {
                    kind: BlindKind::Boss,
                    target_mult: 2.0,
                    reward: 5,
                    hands: 4,
                    discards: 3,
                },
            ],
            antes: [300, 800, 2000, 5000, 11000, 20000, 35000, 50000]
                .iter()
                .enumerate()
                .map(|(idx, &base_target)| AnteRule {
                    ante: idx as u32 + 1,
                    base_target,
                })
                .collect(),
            stickers: StickerRule::default(),
            economy: EconomyRule::default(),
            hand_size: 8,
            joker_slots: 5,
        }
    }

    /// Fail-fast completeness check; every enum value must have an entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in HandKind::ALL {
            self.hand_rule(kind)?;
        }
        for rank in Rank::ALL {
            if !self.ranks.iter().any(|rule| rule.rank == rank) {
                error!(target: "ante::config", rank = ?rank, "rank chip value missing");
                return Err(ConfigError::MissingRank(rank));
            }
        }
        for kind in [BlindKind::Small, BlindKind::Big, BlindKind::Boss] {
            self.blind_rule(kind)?;
        }
        for boss in BossKind::ALL {
            let rule = self.boss_rule(boss)?;
            let problem = if rule.min_ante < 1 {
                Some("min_ante must be at least 1")
            } else if rule.score_multiplier <= 0.0 {
                Some("score multiplier must be positive")
            } else if rule.reward <= 0 {
                Some("reward must be positive")
            } else {
                None
            };
            if let Some(problem) = problem {
                error!(target: "ante::config", boss = ?boss, problem, "invalid boss config");
                return Err(ConfigError::InvalidBoss(boss, problem));
            }
        }
        Ok(())
    }

    pub fn hand_rule(&self, kind: HandKind) -> Result<&HandRule, ConfigError> {
        self.hands
            .iter()
            .find(|rule| rule.kind == kind)
            .ok_or_else(|| {
                error!(target: "ante::config", hand = ?kind, "hand rule missing");
                ConfigError::MissingHand(kind)
            })
    }

    pub fn boss_rule(&self, kind: BossKind) -> Result<&BossRule, ConfigError> {
        self.bosses
            .iter()
            .find(|rule| rule.kind == kind)
            .ok_or_else(|| {
                error!(target: "ante::config", boss = ?kind, "boss rule missing");
                ConfigError::MissingBoss(kind)
            })
    }

    pub fn blind_rule(&self, kind: BlindKind) -> Result<&BlindRule, ConfigError> {
        self.blinds
            .iter()
            .find(|rule| rule.kind == kind)
            .ok_or(ConfigError::MissingBlind(kind))
    }

    pub fn ante_rule(&self, ante: u32) -> Result<&AnteRule, ConfigError> {
        self.antes
            .iter()
            .find(|rule| rule.ante == ante)
            .ok_or(ConfigError::MissingAnte(ante))
    }

    /// Base target before blind-tier or boss scaling.
    pub fn base_target(&self, ante: u32) -> Result<i64, ConfigError> {
        Ok(self.ante_rule(ante)?.base_target)
    }

    pub fn max_ante(&self) -> Option<u32> {
        self.antes.iter().map(|rule| rule.ante).max()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn default_rank_chips(rank: Rank) -> i64 {
    match rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King => 10,
        other => other.value() as i64,
    }
}

fn standard_hands() -> Vec<HandRule> {
    let table: [(HandKind, i64, f64, i64, f64); 12] = [
        (HandKind::HighCard, 5, 1.0, 10, 1.0),
        (HandKind::OnePair, 10, 2.0, 15, 1.0),
        (HandKind::TwoPair, 20, 2.0, 20, 1.0),
        (HandKind::ThreeOfAKind, 30, 3.0, 20, 2.0),
        (HandKind::Straight, 30, 4.0, 30, 3.0),
        (HandKind::Flush, 35, 4.0, 15, 2.0),
        (HandKind::FullHouse, 40, 4.0, 25, 2.0),
        (HandKind::FourOfAKind, 60, 7.0, 30, 3.0),
        (HandKind::StraightFlush, 100, 8.0, 40, 4.0),
        (HandKind::FiveOfAKind, 120, 12.0, 35, 3.0),
        (HandKind::FlushHouse, 140, 14.0, 40, 4.0),
        (HandKind::FlushFive, 160, 16.0, 50, 3.0),
    ];
    table
        .iter()
        .map(
            |&(kind, base_chips, base_mult, level_chips, level_mult)| HandRule {
                kind,
                base_chips,
                base_mult,
                level_chips,
                level_mult,
            },
        )
        .collect()
}

fn standard_bosses() -> Vec<BossRule> {
    let table: [(BossKind, &str, &str, u32); 28] = [
        (BossKind::Hook, "The Hook", "Discards 2 random cards per hand played", 1),
        (BossKind::Ox, "The Ox", "Playing your most played hand sets money to $0", 6),
        (BossKind::House, "The House", "First hand is drawn face down", 2),
        (BossKind::Wall, "The Wall", "Extra large blind", 2),
        (BossKind::Wheel, "The Wheel", "1 in 7 cards get drawn face down", 2),
        (BossKind::Arm, "The Arm", "Decrease level of played poker hand", 2),
        (BossKind::Club, "The Club", "All Club cards are debuffed", 1),
        (BossKind::Fish, "The Fish", "Cards drawn face down after each hand played", 2),
        (BossKind::Psychic, "The Psychic", "Must play 5 cards", 1),
        (BossKind::Goad, "The Goad", "All Spade cards are debuffed", 1),
        (BossKind::Water, "The Water", "Start with 0 discards", 2),
        (BossKind::Window, "The Window", "All Diamond cards are debuffed", 1),
        (BossKind::Manacle, "The Manacle", "-1 hand size", 1),
        (BossKind::Eye, "The Eye", "No repeat hand types this round", 3),
        (BossKind::Mouth, "The Mouth", "Play only 1 hand type this round", 2),
        (BossKind::Plant, "The Plant", "All face cards are debuffed", 4),
        (BossKind::Serpent, "The Serpent", "After play or discard, always draw 3 cards", 5),
        (BossKind::Pillar, "The Pillar", "Cards played previously this ante are debuffed", 1),
        (BossKind::Needle, "The Needle", "Play only 1 hand", 2),
        (BossKind::Head, "The Head", "All Heart cards are debuffed", 1),
        (BossKind::Tooth, "The Tooth", "Lose $1 per card played", 3),
        (BossKind::Flint, "The Flint", "Base chips and mult are halved", 2),
        (BossKind::Mark, "The Mark", "All face cards are drawn face down", 2),
        (BossKind::AmberAcorn, "Amber Acorn", "Flips and shuffles all jokers", 8),
        (BossKind::VerdantLeaf, "Verdant Leaf", "All cards debuffed until 1 joker sold", 8),
        (BossKind::VioletVessel, "Violet Vessel", "Very large blind", 8),
        (BossKind::CrimsonHeart, "Crimson Heart", "One random joker disabled every hand", 8),
        (BossKind::CeruleanBell, "Cerulean Bell", "Forces 1 card to always be selected", 8),
    ];
    table
        .iter()
        .map(|&(kind, name, description, min_ante)| BossRule {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            min_ante,
            score_multiplier: match kind {
                BossKind::Wall => 4.0,
                BossKind::VioletVessel => 6.0,
                _ => 2.0,
            },
            reward: if kind.is_finisher() { 8 } else { 5 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_complete() {
        assert_eq!(GameConfig::standard().validate(), Ok(()));
    }

    #[test]
    fn missing_boss_entry_fails_fast() {
        let mut config = GameConfig::standard();
        config.bosses.retain(|rule| rule.kind != BossKind::Serpent);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingBoss(BossKind::Serpent))
        );
    }

    #[test]
    fn non_positive_multiplier_is_rejected() {
        let mut config = GameConfig::standard();
        if let Some(rule) = config.bosses.iter_mut().find(|r| r.kind == BossKind::Wall) {
            rule.score_multiplier = 0.0;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBoss(BossKind::Wall, _))
        ));
    }

    #[test]
    fn rank_chips_follow_card_faces() {
        assert_eq!(default_rank_chips(Rank::Ace), 11);
        assert_eq!(default_rank_chips(Rank::King), 10);
        assert_eq!(default_rank_chips(Rank::Seven), 7);
    }
}
