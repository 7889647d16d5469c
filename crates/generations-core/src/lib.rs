//! Event catalog, turn resolution, and the game facade for the Generations
//! life simulation.
//!
//! This crate ties the rules together into playable turns: one age-up runs
//! effects, penalties, special events, aging, the death check, and the
//! succession check in order.
//!
//! # Modules
//!
//! - [`catalog`] -- The ordered life event table and its id index.
//! - [`config`] -- Configuration loading from `generations-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`LifeDecisions`] trait and [`GreedyDecisions`].
//! - [`engine`] -- [`LifeEngine`], the facade the browser UI drives.
//! - [`runner`] -- Headless lineage loop.
//! - [`turn`] -- The age-up resolver.
//!
//! [`LifeDecisions`]: decision::LifeDecisions
//! [`GreedyDecisions`]: decision::GreedyDecisions
//! [`LifeEngine`]: engine::LifeEngine

pub mod catalog;
pub mod config;
pub mod decision;
pub mod engine;
pub mod runner;
pub mod turn;

// Re-export primary types at crate root for convenience.
pub use catalog::{CatalogError, DropReason, DroppedSelection, EventCatalog};
pub use config::{ConfigError, GameConfig, LoggingConfig, SimulationConfig};
pub use decision::{GreedyDecisions, LifeDecisions};
pub use engine::LifeEngine;
pub use runner::{LineageEnd, LineageSummary, run_lineage};
pub use turn::{SpecialOutcome, TurnOutcome, TurnPhase, TurnRejection, TurnReport};
