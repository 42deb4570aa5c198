use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::composition::NUMBER_OF_RANKS;
use crate::simulation::shoe::MIN_DECKS_REMAINING;
use crate::{Composition, Rank};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum CountingSystem {
    HiLo,
    Zen,
    OmegaII,
    HiOptII,
}

// Weights in rank order: 2 3 4 5 6 7 8 9 T J Q K A.
const HI_LO: [i32; NUMBER_OF_RANKS] = [1, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1, -1];
const ZEN: [i32; NUMBER_OF_RANKS] = [1, 1, 2, 2, 2, 1, 0, 0, -2, -2, -2, -2, -1];
const OMEGA_II: [i32; NUMBER_OF_RANKS] = [1, 1, 2, 2, 2, 1, 0, -1, -2, -2, -2, -2, 0];
const HI_OPT_II: [i32; NUMBER_OF_RANKS] = [1, 1, 2, 2, 1, 1, 0, 0, -2, -2, -2, -2, 0];

impl CountingSystem {
    pub fn weight(&self, rank: Rank) -> i32 {
        let table = match self {
            CountingSystem::HiLo => &HI_LO,
            CountingSystem::Zen => &ZEN,
            CountingSystem::OmegaII => &OMEGA_II,
            CountingSystem::HiOptII => &HI_OPT_II,
        };
        table[rank.index()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CountingSystem::HiLo => "Hi-Lo",
            CountingSystem::Zen => "Zen",
            CountingSystem::OmegaII => "Omega II",
            CountingSystem::HiOptII => "Hi-Opt II",
        }
    }

    /// Ace-neutral systems lose betting correlation unless Aces are side
    /// counted.
    pub fn requires_ace_side_count(&self) -> bool {
        matches!(self, CountingSystem::OmegaII | CountingSystem::HiOptII)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountState {
    pub running_count: i32,
    pub true_count_float: f64,
    /// Used for strategy index lookups.
    pub true_count_floor: i32,
    /// Rounded toward zero, the conservative figure for betting.
    pub true_count_trunc: i32,
}

pub fn running_count(system: CountingSystem, seen: &Composition) -> i32 {
    seen.iter()
        .map(|(rank, count)| system.weight(rank) * count as i32)
        .sum()
}

/// The denominator is floored at `MIN_DECKS_REMAINING`.
pub fn true_count(running_count: i32, decks_remaining: f64) -> f64 {
    let decks = if decks_remaining.is_nan() {
        MIN_DECKS_REMAINING
    } else {
        decks_remaining.max(MIN_DECKS_REMAINING)
    };
    running_count as f64 / decks
}

pub fn query(system: CountingSystem, seen: &Composition, decks_remaining: f64) -> CountState {
    let running_count = running_count(system, seen);
    let true_count_float = true_count(running_count, decks_remaining);
    CountState {
        running_count,
        true_count_float,
        true_count_floor: true_count_float.floor() as i32,
        true_count_trunc: true_count_float.trunc() as i32,
    }
}

/// Counts for every built-in system, in declaration order.
pub fn query_all(seen: &Composition, decks_remaining: f64) -> Vec<(CountingSystem, CountState)> {
    CountingSystem::iter()
        .map(|system| (system, query(system, seen, decks_remaining)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_systems_are_balanced() {
        let full_deck = Composition::with_number_of_decks(1);
        for system in CountingSystem::iter() {
            assert_eq!(running_count(system, &full_deck), 0, "{}", system.name());
        }
    }

    #[test]
    fn zero_running_count_gives_zero_true_count() {
        for decks in [0.25, 0.5, 1.0, 3.7, 8.0] {
            assert_eq!(true_count(0, decks), 0.0);
        }
    }

    #[test]
    fn floor_and_truncation_differ_below_zero() {
        let mut seen = Composition::empty();
        for _ in 0..3 {
            seen.add_card(Rank::King);
        }
        let state = query(CountingSystem::HiLo, &seen, 2.0);
        assert_eq!(state.running_count, -3);
        assert_eq!(state.true_count_float, -1.5);
        assert_eq!(state.true_count_floor, -2);
        assert_eq!(state.true_count_trunc, -1);
    }

    #[test]
    fn small_denominators_are_guarded() {
        assert_eq!(true_count(2, 0.0), 8.0);
        assert_eq!(true_count(2, 0.1), 8.0);
        assert_eq!(true_count(-1, f64::NAN), -4.0);
    }

    #[test]
    fn weights_follow_system_tables() {
        let mut seen = Composition::empty();
        seen.add_card(Rank::Five);
        seen.add_card(Rank::Nine);
        seen.add_card(Rank::Ace);
        assert_eq!(running_count(CountingSystem::HiLo, &seen), 0);
        assert_eq!(running_count(CountingSystem::Zen, &seen), 1);
        assert_eq!(running_count(CountingSystem::OmegaII, &seen), 1);
        assert_eq!(running_count(CountingSystem::HiOptII, &seen), 2);
        assert!(CountingSystem::OmegaII.requires_ace_side_count());
        assert!(!CountingSystem::Zen.requires_ace_side_count());
        assert_eq!(query_all(&seen, 1.0).len(), 4);
    }
}
