use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Straight ordering value; aces are high (14) and also play low in
    /// straights.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    pub fn is_even(self) -> bool {
        matches!(
            self,
            Rank::Two | Rank::Four | Rank::Six | Rank::Eight | Rank::Ten
        )
    }

    pub fn is_odd(self) -> bool {
        matches!(
            self,
            Rank::Ace | Rank::Three | Rank::Five | Rank::Seven | Rank::Nine
        )
    }

    pub fn is_fibonacci(self) -> bool {
        matches!(
            self,
            Rank::Ace | Rank::Two | Rank::Three | Rank::Five | Rank::Eight
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Bonus,
    Mult,
    Wild,
    Glass,
    Steel,
    Stone,
    Gold,
    Lucky,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edition {
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seal {
    Gold,
    Red,
    Blue,
    Purple,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    #[serde(default)]
    pub id: u32,
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub seal: Option<Seal>,
    #[serde(default)]
    pub face_down: bool,
}

impl Card {
    pub fn standard(suit: Suit, rank: Rank) -> Self {
        Self {
            id: 0,
            suit,
            rank,
            enhancement: None,
            edition: None,
            seal: None,
            face_down: false,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn with_seal(mut self, seal: Seal) -> Self {
        self.seal = Some(seal);
        self
    }

    pub fn is_wild(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Wild))
    }

    pub fn is_stone(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Stone))
    }

    /// Stone cards have no rank for face checks.
    pub fn is_face(&self, all_face: bool) -> bool {
        if self.is_stone() {
            return false;
        }
        all_face || self.rank.is_face()
    }

    /// Suit test honouring wild cards; stone cards match no suit.
    pub fn has_suit(&self, suit: Suit, smeared: bool) -> bool {
        if self.is_stone() {
            return false;
        }
        if self.is_wild() {
            return true;
        }
        if smeared {
            return suit_group(self.suit) == suit_group(suit);
        }
        self.suit == suit
    }

    /// Rank for grouping purposes; stone cards have none.
    pub fn effective_rank(&self) -> Option<Rank> {
        if self.is_stone() {
            None
        } else {
            Some(self.rank)
        }
    }
}

pub(crate) fn suit_group(suit: Suit) -> u8 {
    match suit {
        Suit::Spades | Suit::Clubs => 0,
        Suit::Hearts | Suit::Diamonds => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stone_cards_lose_suit_and_rank() {
        let card = Card::standard(Suit::Hearts, Rank::King).with_enhancement(Enhancement::Stone);
        assert!(!card.has_suit(Suit::Hearts, false));
        assert!(!card.is_face(true));
        assert_eq!(card.effective_rank(), None);
    }

    #[test]
    fn wild_and_smeared_suit_matching() {
        let wild = Card::standard(Suit::Spades, Rank::Two).with_enhancement(Enhancement::Wild);
        for suit in Suit::ALL {
            assert!(wild.has_suit(suit, false));
        }
        let heart = Card::standard(Suit::Hearts, Rank::Two);
        assert!(heart.has_suit(Suit::Diamonds, true));
        assert!(!heart.has_suit(Suit::Diamonds, false));
        assert!(!heart.has_suit(Suit::Clubs, true));
    }
}
