use strum::IntoEnumIterator;

use crate::calibration::EorCalibration;
use crate::counting::{self, CountingSystem};
use crate::simulation::shoe::ShoeState;
use crate::{Composition, Rule};

/// House edge in percent of a six-deck S17 DAS game, before rule adjustments.
pub const BASE_ANCHOR: f64 = -0.36;
const ADJ_H17: f64 = -0.20;
const ADJ_NO_DAS: f64 = -0.14;
const ADJ_RSA: f64 = 0.03;
const ADJ_LS: f64 = 0.08;
const ADJ_NO_PEEK: f64 = -0.11;

/// Slope multiplier for an Ace-neutral system played without an Ace side
/// count.
pub const ACE_PENALTY: f64 = 0.90;

/// Deck counts the slope table is defined for.
const SLOPE_DECKS: [u8; 7] = [1, 2, 4, 6, 8, 10, 12];

// EV percent per true count point, indexed like `SLOPE_DECKS`.
const HI_LO_SLOPE: [f64; 7] = [0.65, 0.60, 0.53, 0.50, 0.47, 0.45, 0.44];
const ZEN_SLOPE: [f64; 7] = [0.70, 0.65, 0.56, 0.53, 0.50, 0.48, 0.46];
const OMEGA_II_SLOPE: [f64; 7] = [0.72, 0.67, 0.58, 0.55, 0.52, 0.50, 0.48];
const HI_OPT_II_SLOPE: [f64; 7] = [0.73, 0.68, 0.60, 0.56, 0.53, 0.51, 0.49];

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn deck_adjustment(number_of_decks: u8) -> f64 {
    match number_of_decks {
        1 => 0.25,
        2 => 0.17,
        4 => 0.06,
        8 => -0.03,
        10 => -0.05,
        12 => -0.06,
        _ => 0.0,
    }
}

/// Instant EV figures from rule and deck-count tables, with no simulation.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEstimator {
    rule: Rule,
    number_of_decks: u8,
    ace_side_count: bool,
}

/// One counting system's line of the count table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountRow {
    pub system: CountingSystem,
    pub running_count: i32,
    pub true_count_trunc: i32,
    pub true_count_floor: i32,
    pub true_count_float: f64,
    pub display_ev: f64,
    pub insurance_roi: Option<f64>,
}

impl EdgeEstimator {
    pub fn new(rule: &Rule, number_of_decks: u8, ace_side_count: bool) -> Self {
        EdgeEstimator {
            rule: *rule,
            number_of_decks,
            ace_side_count,
        }
    }

    /// Player edge in percent off the top of the shoe, rounded to hundredths.
    pub fn base_edge(&self) -> f64 {
        let mut base = BASE_ANCHOR + deck_adjustment(self.number_of_decks);
        if self.rule.dealer_hit_on_soft17 {
            base += ADJ_H17;
        }
        if !self.rule.allow_das {
            base += ADJ_NO_DAS;
        }
        if self.rule.resplit_aces {
            base += ADJ_RSA;
        }
        if self.rule.allow_late_surrender {
            base += ADJ_LS;
        }
        if !self.rule.dealer_peeks() {
            base += ADJ_NO_PEEK;
        }
        round_to_hundredths(base)
    }

    /// EV percent gained per true count point. The deck count is clamped to
    /// 1..=12 and the nearest tabulated count is used, the smaller on a tie.
    pub fn slope(&self, system: CountingSystem) -> f64 {
        let decks = self.number_of_decks.clamp(1, 12);
        let mut nearest = 0;
        for (i, tabulated) in SLOPE_DECKS.iter().enumerate() {
            if tabulated.abs_diff(decks) < SLOPE_DECKS[nearest].abs_diff(decks) {
                nearest = i;
            }
        }
        let table = match system {
            CountingSystem::HiLo => &HI_LO_SLOPE,
            CountingSystem::Zen => &ZEN_SLOPE,
            CountingSystem::OmegaII => &OMEGA_II_SLOPE,
            CountingSystem::HiOptII => &HI_OPT_II_SLOPE,
        };
        let mut slope = table[nearest];
        if system.requires_ace_side_count() && !self.ace_side_count {
            slope *= ACE_PENALTY;
        }
        round_to_hundredths(slope)
    }

    /// `eor_correction` is added as is; see `EorCalibration::correction`.
    pub fn display_ev(
        &self,
        system: CountingSystem,
        true_count_floor: i32,
        eor_correction: f64,
    ) -> f64 {
        self.base_edge() + self.slope(system) * true_count_floor as f64 + eor_correction
    }

    /// A row per counting system for the current shoe. The EOR correction is
    /// applied when a calibration is supplied.
    pub fn table(
        &self,
        shoe: &ShoeState,
        penetration: f64,
        calibration: Option<&EorCalibration>,
    ) -> Vec<CountRow> {
        let remaining = shoe.remaining();
        let seen = shoe.seen();
        let decks_remaining = shoe.decks_remaining_to_cut(penetration);
        let correction = calibration.map_or(0.0, |calibration| calibration.correction(&remaining));
        let insurance_roi = insurance_roi(&remaining);

        CountingSystem::iter()
            .map(|system| {
                let count = counting::query(system, &seen, decks_remaining);
                CountRow {
                    system,
                    running_count: count.running_count,
                    true_count_trunc: count.true_count_trunc,
                    true_count_floor: count.true_count_floor,
                    true_count_float: count.true_count_float,
                    display_ev: self.display_ev(system, count.true_count_floor, correction),
                    insurance_roi,
                }
            })
            .collect()
    }
}

/// Return in percent of a 2:1 insurance bet against this composition, or
/// None if it is empty.
pub fn insurance_roi(composition: &Composition) -> Option<f64> {
    if composition.is_empty() {
        return None;
    }
    let p = composition.ten_value_count() as f64 / composition.get_total() as f64;
    Some((2.0 * p - 1.0) * 100.0)
}

/// Bankroll fraction implied by an edge (in percent) and a per-hand variance,
/// kept within [0, 1].
pub fn kelly_fraction(mean_ev_percent: f64, variance: f64) -> f64 {
    if variance <= 0.0 {
        return 0.0;
    }
    (mean_ev_percent / 100.0 / variance).clamp(0.0, 1.0)
}
