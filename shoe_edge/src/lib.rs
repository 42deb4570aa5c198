pub mod calibration;
mod composition;
pub mod counting;
mod error;
pub mod estimation;
pub mod simulation;
pub mod strategy;
pub mod worker;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use composition::{Composition, ParseRankError, Rank, CARDS_PER_DECK, NUMBER_OF_RANKS};
pub use error::EngineError;

/// Minimum number of cards a composition must hold before it is sampled by
/// the simulator, the EOR calibrator or the action comparison.
pub const MIN_SIMULATION_CARDS: u16 = 20;

/// Deepest split allowed. A hand that has already been split this many times
/// cannot be split again.
pub const MAX_SPLIT_DEPTH: u8 = 3;

/// The table rules. Supplied per call and never mutated by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub dealer_hit_on_soft17: bool,
    pub allow_das: bool,
    pub resplit_aces: bool,
    pub hit_split_aces: bool,
    pub double_on_split_aces: bool,
    pub double_policy: DoublePolicy,
    pub peek_policy: PeekPolicy,
    /// Only meaningful with `PeekPolicy::NoHoleCard`.
    pub original_bets_only: bool,
    pub blackjack_payout: BlackjackPayout,
    pub allow_late_surrender: bool,
}

impl Rule {
    pub fn dealer_peeks(&self) -> bool {
        self.peek_policy == PeekPolicy::PeekEnabled
    }

    /// Original bets only has no effect when the dealer peeks, since a dealer
    /// natural then ends the round before any extra stake is placed.
    pub fn original_bets_only_applies(&self) -> bool {
        !self.dealer_peeks() && self.original_bets_only
    }

    /// Whether a double is permitted for a hand with the given two-card total.
    pub fn allows_double_on(&self, two_card_total: u8) -> bool {
        match self.double_policy {
            DoublePolicy::AnyTwo => true,
            DoublePolicy::TenElevenOnly => two_card_total == 10 || two_card_total == 11,
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            dealer_hit_on_soft17: true,
            allow_das: true,
            resplit_aces: true,
            hit_split_aces: false,
            double_on_split_aces: true,
            double_policy: DoublePolicy::AnyTwo,
            peek_policy: PeekPolicy::PeekEnabled,
            original_bets_only: false,
            blackjack_payout: BlackjackPayout::ThreeToTwo,
            allow_late_surrender: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DoublePolicy {
    AnyTwo,
    TenElevenOnly,
}

/// Peeking and European no-hole-card dealing are the two sides of one switch,
/// so they are a single enum rather than two booleans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum PeekPolicy {
    PeekEnabled,
    NoHoleCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum BlackjackPayout {
    ThreeToTwo,
    SixToFive,
}

impl BlackjackPayout {
    pub fn ratio(&self) -> f64 {
        match self {
            BlackjackPayout::ThreeToTwo => 1.5,
            BlackjackPayout::SixToFive => 1.2,
        }
    }
}

/// The shoe snapshot together with the player's two cards and the dealer's up
/// card, as seen right after the initial deal.
#[derive(Clone, Debug)]
pub struct InitialSituation {
    shoe: Composition,
    hand_cards: (Rank, Rank),
    dealer_up_card: Rank,
}

impl InitialSituation {
    pub fn new(shoe: Composition, hand: (Rank, Rank), dealer_up_card: Rank) -> Self {
        InitialSituation {
            shoe,
            hand_cards: hand,
            dealer_up_card,
        }
    }

    pub fn get_shoe(&self) -> &Composition {
        &self.shoe
    }

    pub fn get_hand_cards(&self) -> (Rank, Rank) {
        self.hand_cards
    }

    pub fn get_dealer_up_card(&self) -> Rank {
        self.dealer_up_card
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Surrender,
    Split,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Decision::Hit => "Hit",
            Decision::Stand => "Stand",
            Decision::Double => "Double",
            Decision::Surrender => "Surrender",
            Decision::Split => "Split",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_bets_only_needs_no_hole_card() {
        let mut rule = Rule {
            original_bets_only: true,
            ..Default::default()
        };
        assert!(!rule.original_bets_only_applies());
        rule.peek_policy = PeekPolicy::NoHoleCard;
        assert!(rule.original_bets_only_applies());
    }

    #[test]
    fn ten_eleven_only_restricts_doubles() {
        let rule = Rule {
            double_policy: DoublePolicy::TenElevenOnly,
            ..Default::default()
        };
        assert!(rule.allows_double_on(10));
        assert!(rule.allows_double_on(11));
        assert!(!rule.allows_double_on(9));
        assert!(!rule.allows_double_on(18));
        assert!(Rule::default().allows_double_on(9));
    }

    #[test]
    fn policies_parse_from_names() {
        let peek: PeekPolicy = "NoHoleCard".parse().unwrap();
        assert_eq!(peek, PeekPolicy::NoHoleCard);
        let payout: BlackjackPayout = "SixToFive".parse().unwrap();
        assert_eq!(payout.ratio(), 1.2);
        assert!("Sometimes".parse::<DoublePolicy>().is_err());
    }
}
