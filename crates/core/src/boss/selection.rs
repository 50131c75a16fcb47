use super::{is_finisher_ante, BossKind};
use crate::{ConfigError, GameConfig, RandomSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{error, info, warn};

/// Per-game memory of which bosses have been seen, plus reroll bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossSelectionState {
    pub appeared_bosses: BTreeSet<BossKind>,
    pub current_ante: u32,
    pub boss_reroll_count: u32,
    pub has_unlimited_rerolls: bool,
    #[serde(default)]
    pub assigned: Option<BossKind>,
}

impl BossSelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; used for a new game.
    pub fn reset(&mut self) {
        *self = Self {
            has_unlimited_rerolls: self.has_unlimited_rerolls,
            ..Self::default()
        };
    }

    pub fn new_ante(&mut self, ante: u32) {
        self.current_ante = ante;
        self.boss_reroll_count = 0;
        self.assigned = None;
    }

    /// Bosses eligible for `ante`, in catalogue order.
    pub fn candidates(&self, ante: u32, config: &GameConfig) -> Result<Vec<BossKind>, ConfigError> {
        let finisher = is_finisher_ante(ante);
        let mut out = Vec::new();
        for boss in BossKind::ALL {
            if self.appeared_bosses.contains(&boss) || boss.is_finisher() != finisher {
                continue;
            }
            if ante == 1 && !boss.allowed_on_ante_one() {
                continue;
            }
            if config.boss_rule(boss)?.min_ante <= ante {
                out.push(boss);
            }
        }
        Ok(out)
    }

    pub fn select_boss(
        &mut self,
        ante: u32,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BossKind, ConfigError> {
        self.current_ante = ante;
        let candidates = self.candidates_with_reset(ante, config)?;
        let boss = pick(&candidates, ante, rng)?;
        self.appeared_bosses.insert(boss);
        self.assigned = Some(boss);
        info!(target: "ante::boss", ante, boss = ?boss, pool = candidates.len(), "boss selected");
        Ok(boss)
    }

    /// Replace the assignment with another eligible boss. The current boss
    /// is only drawn again when it is the sole candidate.
    pub fn reroll_boss(
        &mut self,
        ante: u32,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BossKind, ConfigError> {
        self.current_ante = ante;
        let mut candidates = self.candidates_with_reset(ante, config)?;
        if let Some(current) = self.assigned {
            let without: Vec<BossKind> = candidates
                .iter()
                .copied()
                .filter(|boss| *boss != current)
                .collect();
            if without.is_empty() {
                if !candidates.contains(&current) {
                    candidates.push(current);
                }
            } else {
                candidates = without;
            }
        }
        let boss = pick(&candidates, ante, rng)?;
        self.assigned = Some(boss);
        self.boss_reroll_count += 1;
        self.appeared_bosses.insert(boss);
        info!(
            target: "ante::boss",
            ante,
            boss = ?boss,
            rerolls = self.boss_reroll_count,
            "boss rerolled"
        );
        Ok(boss)
    }

    pub fn can_reroll_boss(&self, has_voucher: bool) -> bool {
        self.has_unlimited_rerolls || (has_voucher && self.boss_reroll_count < 1)
    }

    fn candidates_with_reset(
        &mut self,
        ante: u32,
        config: &GameConfig,
    ) -> Result<Vec<BossKind>, ConfigError> {
        let candidates = self.candidates(ante, config)?;
        if !candidates.is_empty() {
            return Ok(candidates);
        }
        let mut kept = BTreeSet::new();
        for boss in &self.appeared_bosses {
            if config.boss_rule(*boss)?.min_ante > self.current_ante {
                kept.insert(*boss);
            }
        }
        warn!(
            target: "ante::boss",
            ante,
            cleared = self.appeared_bosses.len() - kept.len(),
            "boss pool exhausted, resetting"
        );
        self.appeared_bosses = kept;
        self.candidates(ante, config)
    }

    pub fn get_state(&self) -> BossSelectionState {
        self.clone()
    }

    pub fn restore_state(&mut self, state: BossSelectionState) {
        *self = state;
    }
}

fn pick(
    candidates: &[BossKind],
    ante: u32,
    rng: &mut dyn RandomSource,
) -> Result<BossKind, ConfigError> {
    match rng.pick_index(candidates.len()).and_then(|idx| candidates.get(idx)) {
        Some(boss) => Ok(*boss),
        None => {
            error!(target: "ante::boss", ante, "no boss candidates");
            Err(ConfigError::ExhaustedBossPool { ante })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RngState;

    #[test]
    fn ante_one_draws_from_allow_list() {
        let config = GameConfig::standard();
        for seed in 0..32 {
            let mut state = BossSelectionState::new();
            let mut rng = RngState::from_seed(seed);
            let boss = state.select_boss(1, &config, &mut rng).expect("boss");
            assert!(boss.allowed_on_ante_one(), "{boss:?} on ante 1");
        }
    }

    #[test]
    fn reroll_prefers_a_different_boss() {
        let config = GameConfig::standard();
        let mut state = BossSelectionState::new();
        let mut rng = RngState::from_seed(11);
        let first = state.select_boss(2, &config, &mut rng).expect("boss");
        let second = state.reroll_boss(2, &config, &mut rng).expect("reroll");
        assert_ne!(first, second);
        assert_eq!(state.boss_reroll_count, 1);
        assert!(state.appeared_bosses.contains(&first));
        assert!(state.appeared_bosses.contains(&second));
    }

    #[test]
    fn reroll_entitlement() {
        let mut state = BossSelectionState::new();
        assert!(!state.can_reroll_boss(false));
        assert!(state.can_reroll_boss(true));
        state.boss_reroll_count = 1;
        assert!(!state.can_reroll_boss(true));
        state.new_ante(2);
        assert!(state.can_reroll_boss(true));
        state.has_unlimited_rerolls = true;
        state.boss_reroll_count = 7;
        assert!(state.can_reroll_boss(false));
    }

    #[test]
    fn finisher_pool_resets_once_exhausted() {
        let config = GameConfig::standard();
        let mut state = BossSelectionState::new();
        let mut rng = RngState::from_seed(5);
        for _ in 0..BossKind::FINISHERS.len() + 2 {
            let boss = state.select_boss(8, &config, &mut rng).expect("finisher");
            assert!(boss.is_finisher());
        }
    }
}
