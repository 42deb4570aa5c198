use log::{debug, info};
use shoe_edge_macros::requires_cards;
use strum::IntoEnumIterator;

use crate::composition::NUMBER_OF_RANKS;
use crate::simulation::{MonteCarlo, SimulationParams};
use crate::worker::CancelToken;
use crate::{Composition, EngineError, Rank, Rule, MIN_SIMULATION_CARDS};

/// Fewest hands a perturbed run may use when the count is derived from the
/// baseline count.
pub const MIN_EOR_HANDS: u64 = 2000;

/// The hand count of each perturbed run for a baseline of `number_of_hands`.
pub fn default_eor_hands(number_of_hands: u64) -> u64 {
    (number_of_hands / 2).max(MIN_EOR_HANDS)
}

/// Effects of removal measured against one reference composition. Stale as
/// soon as the shoe moves on; nothing invalidates it automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct EorCalibration {
    /// EV of the unmodified reference, in percent.
    pub baseline_ev: f64,
    /// Percentage points gained by removing one card of each rank, in rank
    /// order. Ranks absent from the reference hold zero.
    pub eor: [f64; NUMBER_OF_RANKS],
    pub reference: Composition,
    pub seed: u64,
}

impl EorCalibration {
    pub fn get(&self, rank: Rank) -> f64 {
        self.eor[rank.index()]
    }

    /// Linear EV correction, in percentage points, for the cards that left the
    /// reference composition to reach `current`.
    pub fn correction(&self, current: &Composition) -> f64 {
        Rank::iter()
            .map(|rank| {
                let removed = self.reference[rank] as f64 - current[rank] as f64;
                self.get(rank) * removed
            })
            .sum()
    }
}

/// Measures how the EV moves when one card of each rank is taken out of the
/// composition.
#[derive(Debug, Clone)]
pub struct EorCalibrator {
    rule: Rule,
    composition: Composition,
    number_of_threads: usize,
}

impl EorCalibrator {
    /// `number_of_threads` of 0 uses the available parallelism.
    pub fn new(rule: &Rule, composition: &Composition, number_of_threads: usize) -> Self {
        let number_of_threads = {
            if number_of_threads == 0 {
                let parallelism = std::thread::available_parallelism();
                match parallelism {
                    Ok(n) => n.get(),
                    Err(_) => 1,
                }
            } else {
                number_of_threads
            }
        };
        EorCalibrator {
            rule: *rule,
            composition: *composition,
            number_of_threads,
        }
    }

    /// Runs the baseline with `params.number_of_hands`, then one perturbed run
    /// of `eor_hands` per rank still present. Each perturbed run reuses the
    /// baseline seed, and its delta is taken against the baseline EV.
    ///
    /// One card more than a simulation needs is required, so every perturbed
    /// composition can still be sampled.
    #[requires_cards(MIN_SIMULATION_CARDS + 1)]
    pub fn run(
        &self,
        params: &SimulationParams,
        eor_hands: u64,
        cancel: &CancelToken,
    ) -> Result<EorCalibration, EngineError> {
        if eor_hands == 0 {
            return Err(EngineError::NoHands);
        }
        info!(
            "Calibrating EOR on {} cards: {} baseline hands, {} hands per rank, {} threads",
            self.composition.get_total(),
            params.number_of_hands,
            eor_hands,
            self.number_of_threads
        );
        let simulator = MonteCarlo::new(&self.rule, &self.composition);
        let baseline_ev = simulator.run(params, cancel)?.mean_ev_percent;

        let eor_params = SimulationParams {
            number_of_hands: eor_hands,
            ..*params
        };

        let ranks: Vec<Rank> = Rank::iter()
            .filter(|rank| self.composition[*rank] > 0)
            .collect();
        let number_of_buckets = self.number_of_threads.min(ranks.len()).max(1);
        let mut dispatched_ranks = vec![Vec::new(); number_of_buckets];
        for (i, rank) in ranks.into_iter().enumerate() {
            dispatched_ranks[i % number_of_buckets].push(rank);
        }

        let mut threads = Vec::with_capacity(number_of_buckets - 1);
        for ranks_for_thread in dispatched_ranks.split_off(1) {
            let calibrator = self.clone();
            let cancel = cancel.clone();
            let thread = std::thread::spawn(move || {
                ranks_for_thread
                    .into_iter()
                    .map(|rank| {
                        calibrator
                            .effect_of_removal(rank, &eor_params, baseline_ev, &cancel)
                            .map(|delta| (rank, delta))
                    })
                    .collect::<Result<Vec<_>, EngineError>>()
            });
            threads.push(thread);
        }

        let mut eor = [0.0; NUMBER_OF_RANKS];
        let mut first_error = None;
        for rank in dispatched_ranks.pop().unwrap_or_default() {
            match self.effect_of_removal(rank, &eor_params, baseline_ev, cancel) {
                Ok(delta) => eor[rank.index()] = delta,
                Err(err) => {
                    first_error = Some(err);
                    break;
                }
            }
        }
        for thread in threads {
            let result = thread.join().unwrap_or(Err(EngineError::WorkerPanicked));
            match result {
                Ok(deltas) => {
                    for (rank, delta) in deltas {
                        eor[rank.index()] = delta;
                    }
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        info!("EOR calibrated: baseline EV {:+.3}%", baseline_ev);
        Ok(EorCalibration {
            baseline_ev,
            eor,
            reference: self.composition,
            seed: params.seed,
        })
    }

    /// EV change, in percentage points, from removing a single `rank` card,
    /// measured against `baseline_ev`. Zero when no such card is left.
    pub fn effect_of_removal(
        &self,
        rank: Rank,
        params: &SimulationParams,
        baseline_ev: f64,
        cancel: &CancelToken,
    ) -> Result<f64, EngineError> {
        let mut perturbed = self.composition;
        if perturbed.remove_card(rank).is_err() {
            return Ok(0.0);
        }
        let ev = MonteCarlo::new(&self.rule, &perturbed)
            .run(params, cancel)?
            .mean_ev_percent;
        let delta = ev - baseline_ev;
        debug!("EOR {}: {:+.4}", rank, delta);
        Ok(delta)
    }
}

/// Calibrates with every available thread and the default perturbed hand
/// count.
pub fn calibrate(
    composition: &Composition,
    rule: &Rule,
    params: &SimulationParams,
) -> Result<EorCalibration, EngineError> {
    EorCalibrator::new(rule, composition, 0).run(
        params,
        default_eor_hands(params.number_of_hands),
        &CancelToken::new(),
    )
}
