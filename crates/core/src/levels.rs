use crate::HandKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Permanent per-hand-type upgrade levels. Every hand starts at level 1 and
/// only consumables move it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandLevelState {
    #[serde(default)]
    levels: BTreeMap<HandKind, u32>,
}

impl HandLevelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, kind: HandKind) -> u32 {
        self.levels.get(&kind).copied().unwrap_or(1)
    }

    pub fn upgrade(&mut self, kind: HandKind, amount: u32) {
        if amount == 0 {
            return;
        }
        let entry = self.levels.entry(kind).or_insert(1);
        *entry = entry.saturating_add(amount);
    }

    pub fn upgrade_all(&mut self, amount: u32) {
        for kind in HandKind::ALL {
            self.upgrade(kind, amount);
        }
    }

    /// Level after a boss reduction, never below 1.
    pub fn effective_level(&self, kind: HandKind, reduction: u32) -> u32 {
        self.level(kind).saturating_sub(reduction).max(1)
    }

    pub fn get_state(&self) -> HandLevelState {
        self.clone()
    }

    pub fn restore_state(&mut self, state: HandLevelState) {
        *self = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_default_to_one_and_upgrade() {
        let mut levels = HandLevelState::new();
        assert_eq!(levels.level(HandKind::Flush), 1);
        levels.upgrade(HandKind::Flush, 2);
        assert_eq!(levels.level(HandKind::Flush), 3);
        levels.upgrade_all(1);
        assert_eq!(levels.level(HandKind::Flush), 4);
        assert_eq!(levels.level(HandKind::HighCard), 2);
    }

    #[test]
    fn effective_level_is_floored_at_one() {
        let mut levels = HandLevelState::new();
        levels.upgrade(HandKind::HighCard, 2);
        assert_eq!(levels.effective_level(HandKind::HighCard, 1), 2);
        assert_eq!(levels.effective_level(HandKind::HighCard, 5), 1);
    }
}
