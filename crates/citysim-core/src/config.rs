//! Configuration loading and typed config structures.
//!
//! The optional `citysim-config.yaml` at the project root mirrors these
//! structs section by section. Every field has a default, so an empty or
//! partial file is valid.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use citysim_agents::DecayConfig;
use citysim_types::TravelMode;
use citysim_world::{BAOAN_VILLAGE, DONGMEN_OLD_STREET, NANSHAN_APARTMENTS};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (timing, persistence, start hour).
    #[serde(default)]
    pub world: WorldConfig,

    /// Per-tick decay rates.
    #[serde(default)]
    pub decay: DecaySection,

    /// Rent, living costs and travel.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Rule engine tuning.
    #[serde(default)]
    pub rules: RulesConfig,

    /// World event, fate and legend odds.
    #[serde(default)]
    pub events: EventsConfig,

    /// Boundary API bind address.
    #[serde(default)]
    pub server: ServerConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// RNG seed. A fresh seed is drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds to wait for the oracle before falling back.
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,

    /// Save a snapshot every this many ticks.
    #[serde(default = "default_autosave_every_ticks")]
    pub autosave_every_ticks: u64,

    /// Where snapshots are written.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Virtual hour at tick 0.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            oracle_timeout_ms: default_oracle_timeout_ms(),
            autosave_every_ticks: default_autosave_every_ticks(),
            snapshot_path: default_snapshot_path(),
            start_hour: default_start_hour(),
        }
    }
}

/// The `decay` section; see [`DecayConfig`] for field meanings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecaySection {
    /// HP lost per awake tick before multipliers.
    pub aging_base: f64,
    /// Aging multiplier while starving.
    pub starvation_multiplier: f64,
    /// Satiety at or below which a bot is starving.
    pub starvation_satiety: u32,
    /// Aging multiplier while exhausted.
    pub exhaustion_multiplier: f64,
    /// Energy below which a bot is exhausted.
    pub exhaustion_energy: u32,
    /// Satiety lost per awake tick.
    pub satiety_decay: u32,
    /// Energy spent per daytime tick.
    pub energy_day_cost: u32,
    /// Energy regained per night tick while awake.
    pub energy_night_recover: u32,
    /// Energy regained per tick asleep.
    pub energy_sleep_recover: u32,
}

impl Default for DecaySection {
    fn default() -> Self {
        let d = DecayConfig::default();
        Self {
            aging_base: d.aging_base,
            starvation_multiplier: d.starvation_multiplier,
            starvation_satiety: d.starvation_satiety,
            exhaustion_multiplier: d.exhaustion_multiplier,
            exhaustion_energy: d.exhaustion_energy,
            satiety_decay: d.satiety_decay,
            energy_day_cost: d.energy_day_cost,
            energy_night_recover: d.energy_night_recover,
            energy_sleep_recover: d.energy_sleep_recover,
        }
    }
}

impl DecaySection {
    /// Convert into the rates the vitals code consumes.
    pub const fn to_decay_config(&self) -> DecayConfig {
        DecayConfig {
            aging_base: self.aging_base,
            starvation_multiplier: self.starvation_multiplier,
            starvation_satiety: self.starvation_satiety,
            exhaustion_multiplier: self.exhaustion_multiplier,
            exhaustion_energy: self.exhaustion_energy,
            satiety_decay: self.satiety_decay,
            energy_day_cost: self.energy_day_cost,
            energy_night_recover: self.energy_night_recover,
            energy_sleep_recover: self.energy_sleep_recover,
        }
    }
}

/// Economy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Daily rent keyed by home location.
    pub rent: BTreeMap<String, u64>,
    /// Rent for homes missing from `rent`.
    pub default_rent: u64,
    /// Daily living cost on top of rent.
    pub misc_cost: u64,
    /// Virtual hour at which rent is due.
    pub rent_hour: u32,
    /// Where evicted bots end up.
    pub fallback_location: String,
    /// Fare for walking.
    pub move_cost_walk: u64,
    /// Fare for the bus.
    pub move_cost_bus: u64,
    /// Fare for a taxi.
    pub move_cost_taxi: u64,
    /// Energy spent on any move.
    pub move_energy: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        let rent = BTreeMap::from([
            (BAOAN_VILLAGE.to_owned(), 15),
            (NANSHAN_APARTMENTS.to_owned(), 50),
        ]);
        Self {
            rent,
            default_rent: 15,
            misc_cost: 5,
            rent_hour: 8,
            fallback_location: DONGMEN_OLD_STREET.to_owned(),
            move_cost_walk: 0,
            move_cost_bus: 3,
            move_cost_taxi: 15,
            move_energy: 5,
        }
    }
}

impl EconomyConfig {
    /// Rent plus living costs for a bot living at `home`.
    pub fn daily_cost(&self, home: &str) -> u64 {
        self.rent
            .get(home)
            .copied()
            .unwrap_or(self.default_rent)
            .saturating_add(self.misc_cost)
    }

    /// Fare for a travel mode.
    pub const fn fare(&self, mode: TravelMode) -> u64 {
        match mode {
            TravelMode::Walk => self.move_cost_walk,
            TravelMode::Bus => self.move_cost_bus,
            TravelMode::Taxi => self.move_cost_taxi,
        }
    }
}

/// Rule engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Active-rule count above which synthesis is throttled.
    pub soft_threshold: usize,
    /// Acceptance probability above the soft threshold.
    pub soft_accept: f64,
    /// Active-rule count above which synthesis is heavily throttled.
    pub hard_threshold: usize,
    /// Acceptance probability above the hard threshold.
    pub hard_accept: f64,
    /// Name term overlap at which a candidate counts as a duplicate.
    pub name_overlap: f64,
    /// Description term overlap at which a candidate counts as a duplicate.
    pub description_overlap: f64,
    /// Lowest durability a synthesized rule may start with.
    pub durability_min: f64,
    /// Highest durability a synthesized rule may start with.
    pub durability_max: f64,
    /// Lowest decay rate.
    pub decay_min: f64,
    /// Highest decay rate.
    pub decay_max: f64,
    /// Public memory entries that trigger a trim.
    pub public_memory_cap: usize,
    /// Public memory entries kept after a trim.
    pub public_memory_trim: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            soft_threshold: 30,
            soft_accept: 0.4,
            hard_threshold: 50,
            hard_accept: 0.15,
            name_overlap: 0.5,
            description_overlap: 0.4,
            durability_min: 1.0,
            durability_max: 1000.0,
            decay_min: 0.01,
            decay_max: 1.0,
            public_memory_cap: 30,
            public_memory_trim: 25,
        }
    }
}

impl RulesConfig {
    /// Probability that a synthesis request is honored given the number of
    /// active rules.
    pub fn synthesis_acceptance(&self, active_rules: usize) -> f64 {
        if active_rules > self.hard_threshold {
            self.hard_accept
        } else if active_rules > self.soft_threshold {
            self.soft_accept
        } else {
            1.0
        }
    }
}

/// World event configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Base chance of a random world event per tick.
    pub world_event_chance: f64,
    /// Chance of a second world event in the same tick.
    pub second_event_chance: f64,
    /// Chance of a personal fate event per tick.
    pub fate_chance: f64,
    /// Virtual hour at which legends spread.
    pub legend_hour: u32,
    /// Chance that a living bot hears a legend.
    pub legend_chance: f64,
    /// Virtual hour at which the world narrative is rewritten.
    pub narrative_hour: u32,
    /// Chance that a bot browses the moments feed.
    pub moment_browse_chance: f64,
    /// Chance that a browsing bot likes a given moment.
    pub moment_like_chance: f64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            world_event_chance: 0.20,
            second_event_chance: 0.08,
            fate_chance: 0.15,
            legend_hour: 20,
            legend_chance: 0.15,
            narrative_hour: 22,
            moment_browse_chance: 0.15,
            moment_like_chance: 0.4,
        }
    }
}

/// Boundary API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_world_name() -> String {
    "Shenzhen".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    15_000
}

const fn default_oracle_timeout_ms() -> u64 {
    20_000
}

const fn default_autosave_every_ticks() -> u64 {
    10
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("world_snapshot.json")
}

const fn default_start_hour() -> u32 {
    6
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.tick_interval_ms, 15_000);
        assert_eq!(config.world.start_hour, 6);
        assert_eq!(config.economy.daily_cost(BAOAN_VILLAGE), 20);
        assert_eq!(config.economy.daily_cost(NANSHAN_APARTMENTS), 55);
        assert_eq!(config.economy.daily_cost("somewhere else"), 20);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = "world:\n  tick_interval_ms: 500\n  seed: 7\neconomy:\n  misc_cost: 9\n";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.tick_interval_ms, 500);
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.autosave_every_ticks, 10);
        assert_eq!(config.economy.misc_cost, 9);
        assert_eq!(config.economy.move_cost_taxi, 15);
        assert_eq!(config.rules.hard_threshold, 50);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn decay_section_round_trips_into_rates() {
        let yaml = "decay:\n  aging_base: 1.0\n";
        let config = SimulationConfig::parse(yaml).unwrap();
        let rates = config.decay.to_decay_config();
        assert!((rates.aging_base - 1.0).abs() < f64::EPSILON);
        assert_eq!(rates.satiety_decay, 2);
    }

    #[test]
    fn synthesis_throttles_above_thresholds() {
        let rules = RulesConfig::default();
        assert!((rules.synthesis_acceptance(10) - 1.0).abs() < f64::EPSILON);
        assert!((rules.synthesis_acceptance(31) - 0.4).abs() < f64::EPSILON);
        assert!((rules.synthesis_acceptance(51) - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn fares_follow_mode() {
        let economy = EconomyConfig::default();
        assert_eq!(economy.fare(TravelMode::Walk), 0);
        assert_eq!(economy.fare(TravelMode::Bus), 3);
        assert_eq!(economy.fare(TravelMode::Taxi), 15);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("citysim-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "failed to load project config: {config:?}");
        }
    }
}
