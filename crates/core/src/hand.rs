use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandKind {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandKind {
    pub const ALL: [HandKind; 12] = [
        HandKind::HighCard,
        HandKind::OnePair,
        HandKind::TwoPair,
        HandKind::ThreeOfAKind,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::FourOfAKind,
        HandKind::StraightFlush,
        HandKind::FiveOfAKind,
        HandKind::FlushHouse,
        HandKind::FlushFive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "highCard",
            HandKind::OnePair => "onePair",
            HandKind::TwoPair => "twoPair",
            HandKind::ThreeOfAKind => "threeOfAKind",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "fullHouse",
            HandKind::FourOfAKind => "fourOfAKind",
            HandKind::StraightFlush => "straightFlush",
            HandKind::FiveOfAKind => "fiveOfAKind",
            HandKind::FlushHouse => "flushHouse",
            HandKind::FlushFive => "flushFive",
        }
    }

    /// Whether a hand of this kind necessarily contains a pair.
    pub fn contains_pair(self) -> bool {
        !matches!(
            self,
            HandKind::HighCard | HandKind::Straight | HandKind::Flush | HandKind::StraightFlush
        )
    }

    pub fn contains_three(self) -> bool {
        matches!(
            self,
            HandKind::ThreeOfAKind
                | HandKind::FullHouse
                | HandKind::FourOfAKind
                | HandKind::FiveOfAKind
                | HandKind::FlushHouse
                | HandKind::FlushFive
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvalRules {
    pub four_fingers: bool,
    pub shortcut: bool,
    pub smeared_suits: bool,
    pub all_face: bool,
    pub splash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandEvaluation {
    pub kind: HandKind,
    pub scoring_indices: Vec<usize>,
}

pub fn classify_hand(cards: &[Card], rules: HandEvalRules) -> HandEvaluation {
    let analysis = HandAnalysis::new(cards, rules);
    let kind = analysis.best_kind();
    let scoring_indices = analysis.scoring_for(kind);
    HandEvaluation {
        kind,
        scoring_indices,
    }
}

pub fn evaluate_hand(cards: &[Card]) -> HandKind {
    classify_hand(cards, HandEvalRules::default()).kind
}

/// Scoring subset for an already-known hand kind.
pub fn scoring_cards(cards: &[Card], kind: HandKind, rules: HandEvalRules) -> Vec<usize> {
    HandAnalysis::new(cards, rules).scoring_for(kind)
}

struct HandAnalysis<'a> {
    cards: &'a [Card],
    rules: HandEvalRules,
    // rank -> indices, excluding stone cards
    groups: BTreeMap<Rank, Vec<usize>>,
    flush: Option<Vec<usize>>,
    straight: Option<Vec<usize>>,
}

impl<'a> HandAnalysis<'a> {
    fn new(cards: &'a [Card], rules: HandEvalRules) -> Self {
        let mut groups: BTreeMap<Rank, Vec<usize>> = BTreeMap::new();
        for (idx, card) in cards.iter().enumerate() {
            if let Some(rank) = card.effective_rank() {
                groups.entry(rank).or_default().push(idx);
            }
        }
        let required = if rules.four_fingers { 4 } else { 5 };
        let flush = find_flush(cards, required, rules.smeared_suits);
        let max_gap = if rules.shortcut { 2 } else { 1 };
        let straight = find_straight(cards, required, max_gap);
        Self {
            cards,
            rules,
            groups,
            flush,
            straight,
        }
    }

    /// Rank groups ordered by size then rank, largest first.
    fn ranked_groups(&self) -> Vec<&Vec<usize>> {
        let mut groups: Vec<(&Rank, &Vec<usize>)> = self.groups.iter().collect();
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(b.0.cmp(a.0)));
        groups.into_iter().map(|(_, indices)| indices).collect()
    }

    fn group_sizes(&self) -> (usize, usize) {
        let groups = self.ranked_groups();
        let first = groups.first().map(|g| g.len()).unwrap_or(0);
        let second = groups.get(1).map(|g| g.len()).unwrap_or(0);
        (first, second)
    }

    fn best_kind(&self) -> HandKind {
        if self.groups.is_empty() {
            return HandKind::HighCard;
        }
        let (first, second) = self.group_sizes();
        let flush = self.flush.is_some();
        let straight = self.straight.is_some();
        if first >= 5 && flush {
            HandKind::FlushFive
        } else if first >= 3 && second >= 2 && flush {
            HandKind::FlushHouse
        } else if first >= 5 {
            HandKind::FiveOfAKind
        } else if straight && flush {
            HandKind::StraightFlush
        } else if first >= 4 {
            HandKind::FourOfAKind
        } else if first >= 3 && second >= 2 {
            HandKind::FullHouse
        } else if flush {
            HandKind::Flush
        } else if straight {
            HandKind::Straight
        } else if first >= 3 {
            HandKind::ThreeOfAKind
        } else if first >= 2 && second >= 2 {
            HandKind::TwoPair
        } else if first >= 2 {
            HandKind::OnePair
        } else {
            HandKind::HighCard
        }
    }

    fn scoring_for(&self, kind: HandKind) -> Vec<usize> {
        if self.cards.is_empty() {
            return Vec::new();
        }
        let mut scoring: Vec<usize> = if self.rules.splash {
            (0..self.cards.len()).collect()
        } else {
            match kind {
                HandKind::HighCard => self.highest_card().into_iter().collect(),
                HandKind::OnePair | HandKind::ThreeOfAKind | HandKind::FourOfAKind => {
                    self.top_groups(1)
                }
                HandKind::TwoPair => self.top_groups(2),
                HandKind::FiveOfAKind => self.top_groups(1),
                HandKind::FullHouse | HandKind::FlushHouse | HandKind::FlushFive => {
                    self.top_groups(2)
                }
                HandKind::Flush => self.flush.clone().unwrap_or_else(|| self.all_ranked()),
                HandKind::Straight => self.straight.clone().unwrap_or_else(|| self.all_ranked()),
                HandKind::StraightFlush => {
                    let mut union = self.flush.clone().unwrap_or_default();
                    union.extend(self.straight.clone().unwrap_or_default());
                    if union.is_empty() {
                        self.all_ranked()
                    } else {
                        union
                    }
                }
            }
        };
        scoring.extend(
            self.cards
                .iter()
                .enumerate()
                .filter(|(_, card)| card.is_stone())
                .map(|(idx, _)| idx),
        );
        scoring.sort_unstable();
        scoring.dedup();
        scoring
    }

    fn top_groups(&self, count: usize) -> Vec<usize> {
        self.ranked_groups()
            .into_iter()
            .take(count)
            .filter(|group| group.len() >= 2 || count == 1)
            .flat_map(|group| group.iter().copied())
            .collect()
    }

    fn all_ranked(&self) -> Vec<usize> {
        self.groups.values().flatten().copied().collect()
    }

    fn highest_card(&self) -> Option<usize> {
        self.groups
            .iter()
            .next_back()
            .and_then(|(_, indices)| indices.first().copied())
    }
}

/// Best-fit flush: wild cards join whichever suit yields the largest group.
fn find_flush(cards: &[Card], required: usize, smeared: bool) -> Option<Vec<usize>> {
    let mut best: Option<Vec<usize>> = None;
    for suit in Suit::ALL {
        let members: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.has_suit(suit, smeared))
            .map(|(idx, _)| idx)
            .collect();
        if members.len() >= required
            && best.as_ref().map(|b| members.len() > b.len()).unwrap_or(true)
        {
            best = Some(members);
        }
    }
    best
}

fn find_straight(cards: &[Card], required: usize, max_gap: u8) -> Option<Vec<usize>> {
    let mut values: Vec<u8> = cards
        .iter()
        .filter_map(|card| card.effective_rank())
        .map(Rank::value)
        .collect();
    if values.contains(&14) {
        values.push(1);
    }
    values.sort_unstable();
    values.dedup();
    if values.len() < required {
        return None;
    }

    let mut best: Option<Vec<u8>> = None;
    let mut chain: Vec<u8> = Vec::new();
    for value in values {
        match chain.last() {
            Some(&last) if value - last <= max_gap => chain.push(value),
            _ => chain = vec![value],
        }
        if chain.len() >= required
            && best.as_ref().map(|b| chain.len() >= b.len()).unwrap_or(true)
        {
            best = Some(chain.clone());
        }
    }

    let chain = best?;
    let members = cards
        .iter()
        .enumerate()
        .filter(|(_, card)| match card.effective_rank() {
            Some(Rank::Ace) => chain.contains(&14) || chain.contains(&1),
            Some(rank) => chain.contains(&rank.value()),
            None => false,
        })
        .map(|(idx, _)| idx)
        .collect();
    Some(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Enhancement;

    fn cards(specs: &[(Suit, Rank)]) -> Vec<Card> {
        specs
            .iter()
            .map(|(suit, rank)| Card::standard(*suit, *rank))
            .collect()
    }

    #[test]
    fn pair_scores_only_the_pair() {
        let hand = cards(&[
            (Suit::Spades, Rank::Ace),
            (Suit::Hearts, Rank::Ace),
            (Suit::Clubs, Rank::Nine),
            (Suit::Diamonds, Rank::Four),
        ]);
        let eval = classify_hand(&hand, HandEvalRules::default());
        assert_eq!(eval.kind, HandKind::OnePair);
        assert_eq!(eval.scoring_indices, vec![0, 1]);
        assert_eq!(eval.kind.id(), "onePair");
    }

    #[test]
    fn splash_scores_every_card() {
        let hand = cards(&[
            (Suit::Spades, Rank::Ace),
            (Suit::Hearts, Rank::Ace),
            (Suit::Clubs, Rank::Nine),
        ]);
        let rules = HandEvalRules {
            splash: true,
            ..HandEvalRules::default()
        };
        assert_eq!(classify_hand(&hand, rules).scoring_indices, vec![0, 1, 2]);
    }

    #[test]
    fn wheel_straight_plays_ace_low() {
        let hand = cards(&[
            (Suit::Spades, Rank::Ace),
            (Suit::Hearts, Rank::Two),
            (Suit::Clubs, Rank::Three),
            (Suit::Diamonds, Rank::Four),
            (Suit::Spades, Rank::Five),
        ]);
        assert_eq!(evaluate_hand(&hand), HandKind::Straight);
    }

    #[test]
    fn shortcut_allows_single_rank_gaps() {
        let hand = cards(&[
            (Suit::Spades, Rank::Two),
            (Suit::Hearts, Rank::Four),
            (Suit::Clubs, Rank::Six),
            (Suit::Diamonds, Rank::Eight),
            (Suit::Spades, Rank::Ten),
        ]);
        assert_eq!(evaluate_hand(&hand), HandKind::HighCard);
        let rules = HandEvalRules {
            shortcut: true,
            ..HandEvalRules::default()
        };
        assert_eq!(classify_hand(&hand, rules).kind, HandKind::Straight);
    }

    #[test]
    fn four_fingers_flush_scores_four_cards() {
        let hand = cards(&[
            (Suit::Hearts, Rank::Two),
            (Suit::Hearts, Rank::Seven),
            (Suit::Hearts, Rank::Nine),
            (Suit::Hearts, Rank::King),
            (Suit::Spades, Rank::Four),
        ]);
        assert_eq!(evaluate_hand(&hand), HandKind::HighCard);
        let rules = HandEvalRules {
            four_fingers: true,
            ..HandEvalRules::default()
        };
        let eval = classify_hand(&hand, rules);
        assert_eq!(eval.kind, HandKind::Flush);
        assert_eq!(eval.scoring_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn smeared_suits_merge_colours() {
        let hand = cards(&[
            (Suit::Hearts, Rank::Two),
            (Suit::Diamonds, Rank::Seven),
            (Suit::Hearts, Rank::Nine),
            (Suit::Diamonds, Rank::King),
            (Suit::Hearts, Rank::Four),
        ]);
        assert_eq!(evaluate_hand(&hand), HandKind::HighCard);
        let rules = HandEvalRules {
            smeared_suits: true,
            ..HandEvalRules::default()
        };
        assert_eq!(classify_hand(&hand, rules).kind, HandKind::Flush);
    }

    #[test]
    fn stone_cards_always_score_but_never_group() {
        let mut hand = cards(&[
            (Suit::Spades, Rank::King),
            (Suit::Hearts, Rank::King),
            (Suit::Clubs, Rank::King),
        ]);
        hand[2].enhancement = Some(Enhancement::Stone);
        let eval = classify_hand(&hand, HandEvalRules::default());
        assert_eq!(eval.kind, HandKind::OnePair);
        assert_eq!(eval.scoring_indices, vec![0, 1, 2]);
    }

    #[test]
    fn only_stone_cards_is_high_card_with_stones_scoring() {
        let hand = vec![
            Card::standard(Suit::Spades, Rank::Two).with_enhancement(Enhancement::Stone),
            Card::standard(Suit::Hearts, Rank::Two).with_enhancement(Enhancement::Stone),
        ];
        let eval = classify_hand(&hand, HandEvalRules::default());
        assert_eq!(eval.kind, HandKind::HighCard);
        assert_eq!(eval.scoring_indices, vec![0, 1]);
    }

    #[test]
    fn flush_house_beats_five_of_a_kind_ordering() {
        let hand = cards(&[
            (Suit::Hearts, Rank::Nine),
            (Suit::Hearts, Rank::Nine),
            (Suit::Hearts, Rank::Nine),
            (Suit::Hearts, Rank::Four),
            (Suit::Hearts, Rank::Four),
        ]);
        assert_eq!(evaluate_hand(&hand), HandKind::FlushHouse);
    }

    #[test]
    fn two_pair_picks_both_pairs() {
        let hand = cards(&[
            (Suit::Hearts, Rank::Nine),
            (Suit::Spades, Rank::Four),
            (Suit::Clubs, Rank::Nine),
            (Suit::Diamonds, Rank::Four),
            (Suit::Hearts, Rank::Ace),
        ]);
        let eval = classify_hand(&hand, HandEvalRules::default());
        assert_eq!(eval.kind, HandKind::TwoPair);
        assert_eq!(eval.scoring_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_selection_has_no_scoring_cards() {
        let eval = classify_hand(&[], HandEvalRules::default());
        assert_eq!(eval.kind, HandKind::HighCard);
        assert!(eval.scoring_indices.is_empty());
    }
}
