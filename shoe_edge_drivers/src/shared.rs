use std::fs;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};
use shoe_edge::calibration::default_eor_hands;
use shoe_edge::counting::CountingSystem;
use shoe_edge::simulation::shoe::ShoeState;
use shoe_edge::{EngineError, Rank, Rule};

/// Fewest hands a simulation request is run with.
pub const MIN_SIMULATION_HANDS: u64 = 2000;
/// Fewest baseline hands a calibration request is run with.
pub const MIN_CALIBRATION_HANDS: u64 = 6000;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown option value: {0}")]
    UnknownOption(#[from] serde::de::value::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Cannot find home directory")]
    NoHomeDirectory,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub shoe: ConfigShoe,
    pub simulation: ConfigSimulation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub dealer_hit_on_soft17: bool,
    pub allow_das: bool,
    pub resplit_aces: bool,
    pub hit_split_aces: bool,
    pub double_on_split_aces: bool,
    pub double_policy: String,
    pub peek_policy: String,
    pub original_bets_only: bool,
    pub blackjack_payout: String,
    pub allow_late_surrender: bool,
}

impl TryInto<Rule> for ConfigRule {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<Rule, Self::Error> {
        let rule = Rule {
            dealer_hit_on_soft17: self.dealer_hit_on_soft17,
            allow_das: self.allow_das,
            resplit_aces: self.resplit_aces,
            hit_split_aces: self.hit_split_aces,
            double_on_split_aces: self.double_on_split_aces,
            double_policy: self.double_policy.parse()?,
            peek_policy: self.peek_policy.parse()?,
            original_bets_only: self.original_bets_only,
            blackjack_payout: self.blackjack_payout.parse()?,
            allow_late_surrender: self.allow_late_surrender,
        };

        Ok(rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigShoe {
    pub number_of_decks: u8,
    /// Dealt fraction of the shoe at which the cut card sits.
    pub penetration: f64,
    #[serde(default)]
    pub ace_side_count: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSimulation {
    pub number_of_hands: u64,
    /// Hands per perturbed calibration run. Derived from `number_of_hands`
    /// when absent.
    #[serde(default)]
    pub eor_hands: Option<u64>,
    /// A random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    pub apply_indices: bool,
    /// 0 means the available parallelism.
    #[serde(default)]
    pub number_of_threads: usize,
    #[serde(default = "default_counting_system")]
    pub counting_system: String,
}

fn default_counting_system() -> String {
    String::from("HiLo")
}

impl ConfigSimulation {
    pub fn get_counting_system(&self) -> Result<CountingSystem, DriverError> {
        Ok(self.counting_system.parse()?)
    }

    pub fn simulation_hands(&self) -> u64 {
        self.number_of_hands.max(MIN_SIMULATION_HANDS)
    }

    pub fn calibration_hands(&self) -> u64 {
        self.number_of_hands.max(MIN_CALIBRATION_HANDS)
    }

    pub fn get_eor_hands(&self) -> u64 {
        self.eor_hands
            .unwrap_or_else(|| default_eor_hands(self.calibration_hands()))
    }
}

impl Config {
    /// Checks what serde cannot: option strings and numeric ranges.
    pub fn validate(&self) -> Result<(), DriverError> {
        if !(1..=12).contains(&self.shoe.number_of_decks) {
            return Err(DriverError::InvalidConfig(format!(
                "number_of_decks must be between 1 and 12, got {}",
                self.shoe.number_of_decks
            )));
        }
        if !(self.shoe.penetration > 0.0 && self.shoe.penetration <= 1.0) {
            return Err(DriverError::InvalidConfig(format!(
                "penetration must be in (0, 1], got {}",
                self.shoe.penetration
            )));
        }
        if self.simulation.eor_hands == Some(0) {
            return Err(DriverError::InvalidConfig(String::from(
                "eor_hands must be positive",
            )));
        }
        let _: Rule = self.rule.clone().try_into()?;
        self.simulation.get_counting_system()?;
        Ok(())
    }

    pub fn get_rule(&self) -> Result<Rule, DriverError> {
        Ok(self.rule.clone().try_into()?)
    }
}

/// Parses and validates a YAML config.
pub fn parse_config(content: &str) -> Result<Config, DriverError> {
    let config: Config = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, DriverError> {
    debug!("Reading config from {}", filename);
    let file_content = fs::read_to_string(filename)?;
    parse_config(&file_content)
}

/// The config file in the home directory.
pub fn default_config_path(file_name: &str) -> Result<PathBuf, DriverError> {
    let home_dir = home::home_dir().ok_or(DriverError::NoHomeDirectory)?;
    Ok(home_dir.join(file_name))
}

/// Replays the cards already dealt into a fresh shoe.
pub fn shoe_from_observations(
    number_of_decks: u8,
    seen: &[Rank],
) -> Result<ShoeState, EngineError> {
    let mut shoe = ShoeState::new(number_of_decks);
    for rank in seen {
        shoe.observe(*rank)?;
    }
    Ok(shoe)
}
