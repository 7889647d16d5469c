//! Configuration loading for the Generations simulator.
//!
//! The canonical configuration lives in `generations-config.yaml` at the
//! project root. Every section and field is optional: a missing value takes
//! the documented default, so an empty file is a valid configuration.

use std::path::Path;

use generations_rules::{RulesConfig, RulesError};
use serde::Deserialize;

/// Environment variable that overrides `simulation.seed`.
pub const SEED_ENV_VAR: &str = "GENERATIONS_SEED";

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

    /// The rule parameters are inconsistent.
    #[error("invalid rules: {source}")]
    Rules {
        /// The rule validation failure.
        #[from]
        source: RulesError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `generations-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Rule parameters (age bands, thresholds, probabilities).
    #[serde(default)]
    pub rules: RulesConfig,

    /// Headless simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `GENERATIONS_SEED` overrides `simulation.seed` when set to a valid
    /// integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Rules`] if the rule parameters are inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Rules`] if the rule parameters are inconsistent.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.simulation.apply_env_overrides();
        config.rules.validate()?;
        Ok(config)
    }
}

/// Headless simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Number of lineages to play (default: 1).
    #[serde(default = "default_lives")]
    pub lives: u32,

    /// Random seed (default: 42).
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Safety limit on age-ups per lineage (default: 2000).
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Most generations a lineage may run before the simulator stops it
    /// (default: 10).
    #[serde(default = "default_max_generations")]
    pub max_generations: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lives: default_lives(),
            seed: default_seed(),
            max_turns: default_max_turns(),
            max_generations: default_max_generations(),
        }
    }
}

impl SimulationConfig {
    /// Apply `GENERATIONS_SEED` if it is set and parses as a `u64`.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var(SEED_ENV_VAR)
            .ok()
            .and_then(|val| val.trim().parse().ok())
        {
            self.seed = seed;
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text (default: false).
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_lives() -> u32 {
    1
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_turns() -> u32 {
    2000
}

const fn default_max_generations() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}
