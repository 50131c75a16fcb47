use crate::{shuffle_with, Card, DeckCounters, Enhancement, RandomSource, Rank, Suit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
    #[serde(default)]
    pub starting_size: usize,
    #[serde(default)]
    next_id: u32,
}

impl Deck {
    /// The 52-card deck with ids 1..=52.
    pub fn standard52() -> Self {
        let mut deck = Self::default();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                deck.insert(Card::standard(suit, rank));
            }
        }
        deck.starting_size = deck.draw.len();
        deck
    }

    /// Add a card to the draw pile under a fresh id; returns the stored card.
    pub fn insert(&mut self, card: Card) -> Card {
        self.next_id = self.next_id.max(1);
        let card = card.with_id(self.next_id);
        self.next_id += 1;
        self.draw.push(card);
        card
    }

    pub fn shuffle(&mut self, rng: &mut dyn RandomSource) {
        shuffle_with(&mut self.draw, rng);
    }

    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let keep = self.draw.len().saturating_sub(count);
        let mut cards = self.draw.split_off(keep);
        cards.reverse();
        cards
    }

    pub fn discard(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard.extend(cards.into_iter().map(|mut card| {
            card.face_down = false;
            card
        }));
    }

    /// Pull everything back into the draw pile and shuffle.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.draw.append(&mut self.discard);
        self.shuffle(rng);
    }

    /// Drop a card from the deck for good.
    pub fn destroy(&mut self, id: u32) {
        self.draw.retain(|card| card.id != id);
        self.discard.retain(|card| card.id != id);
    }

    /// Counters seen by jokers; `in_hand` are the cards currently out of
    /// both piles.
    pub fn counters(&self, in_hand: &[Card]) -> DeckCounters {
        let all = || self.draw.iter().chain(&self.discard).chain(in_hand);
        DeckCounters {
            remaining: self.draw.len(),
            full_size: all().count(),
            starting_size: self.starting_size,
            steel_cards: all()
                .filter(|card| card.enhancement == Some(Enhancement::Steel))
                .count(),
            stone_cards: all().filter(|card| card.is_stone()).count(),
        }
    }
}
