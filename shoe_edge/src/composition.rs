use std::ops::{Index, SubAssign};
use std::str::FromStr;

use rand::Rng;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::EngineError;

pub const NUMBER_OF_RANKS: usize = 13;
pub const CARDS_PER_DECK: u16 = 52;

/// One of the 13 card ranks. The declaration order is the order used for
/// every per-rank table and for sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Rank {
    Two = 0,
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
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Note that this method treats Ace as 1.
    pub fn blackjack_value(&self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            _ => self.index() as u8 + 2,
        }
    }

    pub fn is_ten_value(&self) -> bool {
        self.blackjack_value() == 10
    }

    /// Collapses the ten-value ranks into `Rank::Ten`, the class used for
    /// pairing.
    pub fn group(&self) -> Rank {
        if self.is_ten_value() {
            Rank::Ten
        } else {
            *self
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self.blackjack_value(), 2..=6)
    }

    pub fn symbol(&self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.symbol().encode_utf8(&mut [0; 4]))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid rank symbol: {0:?}")]
pub struct ParseRankError(String);

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(ParseRankError(s.to_string())),
        };
        Ok(rank)
    }
}

/// This provides a container to store the numbers of each rank. Counts never
/// go below zero: removals of an absent rank are refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Composition {
    counts: [u16; NUMBER_OF_RANKS],
    total: u16,
}

impl Composition {
    pub fn new(counts: &[u16; NUMBER_OF_RANKS]) -> Composition {
        Composition {
            counts: *counts,
            total: counts.iter().sum(),
        }
    }

    pub fn with_number_of_decks(number_of_decks: u8) -> Composition {
        Self::new(&[number_of_decks as u16 * 4; NUMBER_OF_RANKS])
    }

    pub fn empty() -> Composition {
        Self::new(&[0; NUMBER_OF_RANKS])
    }

    pub fn add_card(&mut self, rank: Rank) {
        self.counts[rank.index()] += 1;
        self.total += 1;
    }

    /// Remove a card of the given rank. Nothing changes if none is left.
    pub fn remove_card(&mut self, rank: Rank) -> Result<(), EngineError> {
        let count = &mut self.counts[rank.index()];
        if *count == 0 {
            return Err(EngineError::RankExhausted(rank));
        }
        *count -= 1;
        self.total -= 1;
        Ok(())
    }

    pub fn get_total(&self) -> u16 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn ten_value_count(&self) -> u16 {
        Rank::iter()
            .filter(|rank| rank.is_ten_value())
            .map(|rank| self[rank])
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rank, u16)> + '_ {
        Rank::iter().map(move |rank| (rank, self[rank]))
    }

    /// Samples one card without replacement. Every remaining card is equally
    /// likely. Returns None if the composition is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Rank> {
        if self.total == 0 {
            return None;
        }
        let pick = rng.gen_range(0..self.total);
        let mut cumulative = 0;
        for rank in Rank::iter() {
            cumulative += self.counts[rank.index()];
            if pick < cumulative {
                self.counts[rank.index()] -= 1;
                self.total -= 1;
                return Some(rank);
            }
        }
        None
    }
}

impl Index<Rank> for Composition {
    type Output = u16;
    fn index(&self, index: Rank) -> &Self::Output {
        &self.counts[index.index()]
    }
}

/// Note that this won't check that every count of `rhs` is covered by `self`.
impl SubAssign<&Composition> for Composition {
    fn sub_assign(&mut self, rhs: &Composition) {
        for i in 0..self.counts.len() {
            self.counts[i] -= rhs.counts[i];
        }
        self.total -= rhs.total;
    }
}
