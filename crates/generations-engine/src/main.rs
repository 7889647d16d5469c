//! Headless simulator for the Generations life simulation.
//!
//! Plays a number of lineages back to back with the greedy decision policy
//! and logs a summary of each. Useful for tuning rule parameters without the
//! browser UI.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `generations-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the event catalog (`generations-events.yaml` or the built-in table)
//! 4. Seed the random source
//! 5. Play each lineage
//! 6. Log the totals

mod error;

use std::path::Path;

use generations_core::catalog::EventCatalog;
use generations_core::config::{GameConfig, LoggingConfig};
use generations_core::decision::GreedyDecisions;
use generations_core::engine::LifeEngine;
use generations_core::runner::{self, LineageEnd};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const CONFIG_PATH: &str = "generations-config.yaml";
const CATALOG_PATH: &str = "generations-events.yaml";

/// Application entry point for the simulator.
///
/// # Errors
///
/// Returns an error if the configuration or the event catalog cannot be
/// loaded.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether the
    //    file was found and report it afterwards.
    let (config, found) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("generations-engine starting");
    if !found {
        info!("Config file not found, using defaults");
    }
    info!(
        lives = config.simulation.lives,
        seed = config.simulation.seed,
        max_turns = config.simulation.max_turns,
        max_generations = config.simulation.max_generations,
        "Configuration loaded"
    );

    // 3. Load the event catalog.
    let catalog = load_catalog()?;
    info!(events = catalog.len(), "Event catalog loaded");

    // 4. Seed the random source.
    let rng = SmallRng::seed_from_u64(config.simulation.seed);
    let mut engine = LifeEngine::new(catalog, config.rules.clone(), rng);
    let mut decisions = GreedyDecisions::new();

    // 5. Play each lineage.
    let mut total_generations: u32 = 0;
    let mut total_births: u32 = 0;
    let mut extinct: u32 = 0;
    for life in 1..=config.simulation.lives {
        info!(life, "Lineage started");
        let summary = runner::run_lineage(&mut engine, &mut decisions, &config.simulation);
        total_generations = total_generations.saturating_add(summary.generations);
        total_births = total_births.saturating_add(summary.births);
        if summary.end == LineageEnd::Extinct {
            extinct = extinct.saturating_add(1);
        }
    }

    // 6. Log the totals.
    info!(
        lives = config.simulation.lives,
        total_generations,
        total_births,
        extinct,
        "generations-engine finished"
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the game configuration from `generations-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Returns the configuration and whether the file existed.
fn load_config() -> Result<(GameConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((GameConfig::from_file(config_path)?, true))
    } else {
        // Defaults still honor GENERATIONS_SEED.
        Ok((GameConfig::parse("")?, false))
    }
}

/// Load the event catalog from `generations-events.yaml`, falling back to
/// the built-in table.
fn load_catalog() -> Result<EventCatalog, EngineError> {
    let catalog_path = Path::new(CATALOG_PATH);
    if catalog_path.exists() {
        Ok(EventCatalog::from_file(catalog_path)?)
    } else {
        Ok(EventCatalog::standard())
    }
}
