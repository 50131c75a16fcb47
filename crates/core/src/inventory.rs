use crate::{Edition, JokerKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JokerStickers {
    pub eternal: bool,
    pub perishable: bool,
    #[serde(default)]
    pub perish_rounds_left: u32,
    pub rental: bool,
}

/// Private key-value state of one joker instance. Keys are only ever read
/// and written by that instance's own effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokerState(BTreeMap<String, f64>);

impl JokerState {
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn add(&mut self, key: &str, delta: f64) -> f64 {
        let entry = self.0.entry(key.to_string()).or_insert(0.0);
        *entry += delta;
        *entry
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerInstance {
    pub id: u32,
    pub kind: JokerKind,
    pub rarity: JokerRarity,
    pub cost: i64,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub stickers: JokerStickers,
    #[serde(default)]
    pub state: JokerState,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub face_down: bool,
}

impl JokerInstance {
    pub fn sell_value(&self) -> i64 {
        (self.cost / 2).max(1) + self.state.get("sell_bonus") as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("no joker slots")]
    NoJokerSlots,
    #[error("invalid joker index {0}")]
    InvalidIndex(usize),
    #[error("eternal jokers cannot be sold")]
    Eternal,
}

/// Ordered joker slots. Position is meaningful: effects resolve left to
/// right and copy jokers address their neighbours by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerSlots {
    pub capacity: usize,
    jokers: Vec<JokerInstance>,
    #[serde(default)]
    next_id: u32,
}

impl JokerSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            jokers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn effective_capacity(&self) -> usize {
        self.capacity + self.negative_bonus()
    }

    fn negative_bonus(&self) -> usize {
        self.jokers
            .iter()
            .filter(|joker| joker.edition == Some(Edition::Negative))
            .count()
    }

    pub fn len(&self) -> usize {
        self.jokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JokerInstance> {
        self.jokers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut JokerInstance> {
        self.jokers.iter_mut()
    }

    pub fn as_slice(&self) -> &[JokerInstance] {
        &self.jokers
    }

    pub fn get(&self, index: usize) -> Option<&JokerInstance> {
        self.jokers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut JokerInstance> {
        self.jokers.get_mut(index)
    }

    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.jokers.iter().position(|joker| joker.id == id)
    }

    pub fn add(&mut self, kind: JokerKind) -> Result<u32, SlotError> {
        self.add_with_edition(kind, None)
    }

    pub fn add_with_edition(
        &mut self,
        kind: JokerKind,
        edition: Option<Edition>,
    ) -> Result<u32, SlotError> {
        let mut capacity = self.effective_capacity();
        if edition == Some(Edition::Negative) {
            capacity = capacity.saturating_add(1);
        }
        if self.jokers.len() >= capacity {
            return Err(SlotError::NoJokerSlots);
        }
        let id = self.alloc_id();
        let mut state = JokerState::default();
        kind.init_state(&mut state);
        self.jokers.push(JokerInstance {
            id,
            kind,
            rarity: kind.rarity(),
            cost: kind.cost(),
            edition,
            stickers: JokerStickers::default(),
            state,
            disabled: false,
            face_down: false,
        });
        Ok(id)
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        id
    }

    pub fn remove(&mut self, index: usize) -> Result<JokerInstance, SlotError> {
        if index >= self.jokers.len() {
            return Err(SlotError::InvalidIndex(index));
        }
        Ok(self.jokers.remove(index))
    }

    pub fn remove_ids(&mut self, ids: &[u32]) -> Vec<JokerInstance> {
        let mut removed = Vec::new();
        self.jokers.retain(|joker| {
            if ids.contains(&joker.id) {
                removed.push(joker.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove a joker for sale. Eternal jokers stay put.
    pub fn sell(&mut self, index: usize) -> Result<(JokerInstance, i64), SlotError> {
        let joker = self.get(index).ok_or(SlotError::InvalidIndex(index))?;
        if joker.stickers.eternal {
            return Err(SlotError::Eternal);
        }
        let value = joker.sell_value();
        let joker = self.remove(index)?;
        Ok((joker, value))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SlotError> {
        let len = self.jokers.len();
        if a >= len {
            return Err(SlotError::InvalidIndex(a));
        }
        if b >= len {
            return Err(SlotError::InvalidIndex(b));
        }
        self.jokers.swap(a, b);
        Ok(())
    }

    pub fn shuffle_with(&mut self, rng: &mut dyn crate::RandomSource) {
        crate::shuffle_with(&mut self.jokers, rng);
    }

    pub fn get_state(&self) -> JokerSlots {
        self.clone()
    }

    pub fn restore_state(&mut self, state: JokerSlots) {
        *self = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_edition_extends_capacity() {
        let mut slots = JokerSlots::new(1);
        slots.add(JokerKind::Joker).expect("first slot");
        assert_eq!(slots.add(JokerKind::Joker), Err(SlotError::NoJokerSlots));
        slots
            .add_with_edition(JokerKind::Joker, Some(Edition::Negative))
            .expect("negative joker fits");
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn eternal_jokers_cannot_be_sold() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::Joker).expect("add");
        slots.get_mut(0).expect("joker").stickers.eternal = true;
        assert_eq!(slots.sell(0), Err(SlotError::Eternal));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn instance_ids_are_unique_and_stable() {
        let mut slots = JokerSlots::new(5);
        let a = slots.add(JokerKind::Joker).expect("a");
        let b = slots.add(JokerKind::Banner).expect("b");
        assert_ne!(a, b);
        slots.swap(0, 1).expect("swap");
        assert_eq!(slots.position_of(a), Some(1));
        let removed = slots.remove_ids(&[b]);
        assert_eq!(removed.len(), 1);
        assert_eq!(slots.position_of(a), Some(0));
    }

    #[test]
    fn state_bags_are_private_per_instance() {
        let mut slots = JokerSlots::new(5);
        slots.add(JokerKind::FlashCard).expect("a");
        slots.add(JokerKind::FlashCard).expect("b");
        slots.get_mut(0).expect("a").state.add("mult", 2.0);
        assert_eq!(slots.get(0).expect("a").state.get("mult"), 2.0);
        assert_eq!(slots.get(1).expect("b").state.get("mult"), 0.0);
    }
}
