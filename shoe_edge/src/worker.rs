use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{debug, error};

use crate::calibration::{EorCalibration, EorCalibrator};
use crate::simulation::{Comparison, MonteCarlo, SimulationParams, SimulationResult};
use crate::{Composition, EngineError, Rank, Rule};

/// A flag shared between a caller and a background computation. Once set it
/// stays set; the computation notices it at its next checkpoint and returns
/// `EngineError::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A computation running on its own thread. The caller keeps interacting with
/// its shoe state while the job works on a snapshot.
#[derive(Debug)]
pub struct Job<T> {
    handle: JoinHandle<Result<T, EngineError>>,
    cancel: CancelToken,
}

impl<T: Send + 'static> Job<T> {
    fn spawn<F>(name: &str, work: F) -> Job<T>
    where
        F: FnOnce(&CancelToken) -> Result<T, EngineError> + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let name = name.to_string();
        debug!("Starting {} job", name);
        let handle = std::thread::spawn(move || {
            let result = work(&token);
            debug!("{} job finished", name);
            result
        });
        Job { handle, cancel }
    }

    /// Asks the job to stop. `join` then returns `EngineError::Cancelled`
    /// unless the job had already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the result.
    pub fn join(self) -> Result<T, EngineError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!("A worker thread panicked");
                Err(EngineError::WorkerPanicked)
            }
        }
    }
}

pub fn spawn_simulation(
    rule: &Rule,
    composition: &Composition,
    params: SimulationParams,
) -> Job<SimulationResult> {
    let simulator = MonteCarlo::new(rule, composition);
    Job::spawn("simulation", move |cancel| simulator.run(&params, cancel))
}

pub fn spawn_calibration(
    calibrator: EorCalibrator,
    params: SimulationParams,
    eor_hands: u64,
) -> Job<EorCalibration> {
    Job::spawn("calibration", move |cancel| {
        calibrator.run(&params, eor_hands, cancel)
    })
}

pub fn spawn_comparison(
    rule: &Rule,
    composition: &Composition,
    hand: (Rank, Rank),
    dealer_up_card: Rank,
    params: SimulationParams,
) -> Job<Comparison> {
    let simulator = MonteCarlo::new(rule, composition);
    Job::spawn("comparison", move |cancel| {
        simulator.compare_actions(hand, dealer_up_card, &params, cancel)
    })
}

/// A seed for callers that do not need reproducible runs.
pub fn random_seed() -> u64 {
    rand::random()
}
