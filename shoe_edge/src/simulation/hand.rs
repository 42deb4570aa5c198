use crate::Rank;

/// Represents one group of cards held by the player or the dealer. A hand that
/// comes from a split remembers how deep in the split tree it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    cards: Vec<Rank>,
    doubled: bool,
    split_depth: u8,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(4),
            doubled: false,
            split_depth: 0,
        }
    }

    pub fn from_cards(cards: &[Rank]) -> Hand {
        let mut hand = Hand::new();
        hand.cards.extend_from_slice(cards);
        hand
    }

    /// One half of a split: the given card alone, one level deeper.
    pub fn split_from(card: Rank, split_depth: u8) -> Hand {
        let mut hand = Hand::new();
        hand.cards.push(card);
        hand.split_depth = split_depth;
        hand
    }

    pub fn receive_card(&mut self, card: Rank) {
        self.cards.push(card);
    }

    pub fn double_down(&mut self) {
        self.doubled = true;
    }

    pub fn get_cards(&self) -> &[Rank] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    pub fn get_split_depth(&self) -> u8 {
        self.split_depth
    }

    /// Units at risk on this hand.
    pub fn stake(&self) -> f64 {
        if self.doubled {
            2.0
        } else {
            1.0
        }
    }

    /// Note that this method treats every Ace as 1.
    pub fn get_sum(&self) -> u8 {
        self.cards.iter().map(|card| card.blackjack_value()).sum()
    }

    fn has_ace(&self) -> bool {
        self.cards.contains(&Rank::Ace)
    }

    /// Whether one Ace can still be counted as 11.
    pub fn is_soft(&self) -> bool {
        self.has_ace() && self.get_sum() + 10 <= 21
    }

    pub fn get_actual_sum(&self) -> u8 {
        if self.is_soft() {
            self.get_sum() + 10
        } else {
            self.get_sum()
        }
    }

    pub fn bust(&self) -> bool {
        self.get_sum() > 21
    }

    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.has_ace() && self.cards.iter().any(|c| c.is_ten_value())
    }

    /// Two cards of the same rank group, ten-value ranks counting as one group.
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].group() == self.cards[1].group()
    }

    pub fn is_pair_of(&self, rank: Rank) -> bool {
        self.is_pair() && self.cards[0].group() == rank.group()
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand::new()
    }
}
