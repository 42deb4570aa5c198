mod report;

use clap::{Args, Parser, Subcommand};
use log::info;
use shoe_edge::calibration::EorCalibrator;
use shoe_edge::counting;
use shoe_edge::estimation::EdgeEstimator;
use shoe_edge::simulation::shoe::ShoeState;
use shoe_edge::simulation::SimulationParams;
use shoe_edge::{strategy, worker, Rank};
use shoe_edge_drivers::{
    default_config_path, parse_config_from_file, shoe_from_observations, Config, DriverError,
};

const DEFAULT_CONFIG_PATH: &str = "~/.shoe_edge.yml";
const DEFAULT_CONFIG_FILE_NAME: &str = ".shoe_edge.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// A card already dealt from the shoe (2-9, T, J, Q, K, A). Repeat for
    /// every card, in the order dealt
    #[arg(short, long = "seen")]
    seen: Vec<Rank>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shows every counting system with its EV estimate
    Counts,
    /// Recommends the play for a two-card hand
    Advise(HandArgs),
    /// Simulates the EV of the remaining shoe
    Simulate,
    /// Measures the effect of removal of each rank, then shows the corrected
    /// counts
    Calibrate,
    /// Simulates every legal first action for a two-card hand
    Compare(HandArgs),
}

#[derive(Debug, Args)]
struct HandArgs {
    /// One of the player's cards. Give exactly two
    #[arg(long = "hand", required = true)]
    hand: Vec<Rank>,

    /// The dealer's up card
    #[arg(long)]
    up: Rank,
}

impl HandArgs {
    fn get_hand(&self) -> Result<(Rank, Rank), DriverError> {
        match self.hand.as_slice() {
            [first, second] => Ok((*first, *second)),
            _ => Err(DriverError::InvalidArguments(format!(
                "expected two --hand cards, got {}",
                self.hand.len()
            ))),
        }
    }
}

/// What every subcommand needs: the parsed config and the shoe rebuilt from
/// the observations.
struct Session {
    config: Config,
    shoe: ShoeState,
}

impl Session {
    fn true_count_floor(&self) -> Result<i32, DriverError> {
        let system = self.config.simulation.get_counting_system()?;
        let decks_remaining = self
            .shoe
            .decks_remaining_to_cut(self.config.shoe.penetration);
        Ok(counting::query(system, &self.shoe.seen(), decks_remaining).true_count_floor)
    }

    fn get_params(&self, number_of_hands: u64) -> Result<SimulationParams, DriverError> {
        let seed = self.config.simulation.seed.unwrap_or_else(worker::random_seed);
        Ok(SimulationParams {
            number_of_hands,
            seed,
            true_count_floor: self.true_count_floor()?,
            apply_indices: self.config.simulation.apply_indices,
        })
    }

    fn get_estimator(&self) -> Result<EdgeEstimator, DriverError> {
        Ok(EdgeEstimator::new(
            &self.config.get_rule()?,
            self.config.shoe.number_of_decks,
            self.config.shoe.ace_side_count,
        ))
    }
}

fn resolve_config_path(config: String) -> Result<String, DriverError> {
    if config != DEFAULT_CONFIG_PATH {
        return Ok(config);
    }
    let config_file_path = default_config_path(DEFAULT_CONFIG_FILE_NAME)?;
    if !config_file_path.exists() {
        return Err(DriverError::InvalidArguments(format!(
            "config file {} does not exist",
            config_file_path.display()
        )));
    }
    if config_file_path.is_dir() {
        return Err(DriverError::InvalidArguments(String::from(
            "the config should be a file rather than a directory",
        )));
    }
    Ok(config_file_path.to_string_lossy().into_owned())
}

fn run(args: CommandLineArgs) -> Result<(), DriverError> {
    let config_path = resolve_config_path(args.config)?;
    let config = parse_config_from_file(&config_path)?;
    info!("Loaded config from {}", config_path);
    let shoe = shoe_from_observations(config.shoe.number_of_decks, &args.seen)?;
    let session = Session { config, shoe };
    let rule = session.config.get_rule()?;
    let penetration = session.config.shoe.penetration;

    match args.command {
        Command::Counts => {
            let estimator = session.get_estimator()?;
            report::print_progress(&session.shoe, penetration);
            report::print_table(&estimator, &estimator.table(&session.shoe, penetration, None));
        }
        Command::Advise(hand_args) => {
            let hand = hand_args.get_hand()?;
            let true_count_floor = session.true_count_floor()?;
            let decision = strategy::advise(
                hand,
                hand_args.up,
                true_count_floor,
                &rule,
                session.config.simulation.apply_indices,
            );
            report::print_advice(hand, hand_args.up, true_count_floor, decision);
        }
        Command::Simulate => {
            let params = session.get_params(session.config.simulation.simulation_hands())?;
            let job = worker::spawn_simulation(&rule, &session.shoe.remaining(), params);
            report::print_simulation(&job.join()?);
        }
        Command::Calibrate => {
            let params = session.get_params(session.config.simulation.calibration_hands())?;
            let calibrator = EorCalibrator::new(
                &rule,
                &session.shoe.remaining(),
                session.config.simulation.number_of_threads,
            );
            let job = worker::spawn_calibration(
                calibrator,
                params,
                session.config.simulation.get_eor_hands(),
            );
            report::print_calibration(&job.join()?);
        }
        Command::Compare(hand_args) => {
            let hand = hand_args.get_hand()?;
            let params = session.get_params(session.config.simulation.simulation_hands())?;
            let job = worker::spawn_comparison(
                &rule,
                &session.shoe.remaining(),
                hand,
                hand_args.up,
                params,
            );
            report::print_comparison(&job.join()?, params.seed);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandLineArgs::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
