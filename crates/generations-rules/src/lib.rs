//! Stat, eligibility, penalty, death, and lineage rules for the Generations
//! life simulation.
//!
//! This crate is the logic layer: pure functions over
//! [`CharacterState`](generations_types::CharacterState) and the catalog's
//! [`EventDefinition`](generations_types::EventDefinition)s. It performs no
//! I/O. Randomness comes from a caller-supplied [`rand::Rng`].
//!
//! # Modules
//!
//! - [`aging`] -- Elder health decay
//! - [`config`] -- Tunable rule parameters ([`RulesConfig`])
//! - [`death`] -- Death chance and the yearly death check ([`DeathVerdict`])
//! - [`dice`] -- Exact decimal random draws
//! - [`eligibility`] -- Which events are available this turn
//! - [`error`] -- Error types for rule operations ([`RulesError`])
//! - [`lineage`] -- Marriage, children, succession, and prestige
//! - [`penalty`] -- Over-selection penalties ([`PenaltyBreakdown`])
//! - [`stats`] -- Applying stat deltas with clamping

pub mod aging;
pub mod config;
pub mod death;
pub mod dice;
pub mod eligibility;
pub mod error;
pub mod lineage;
pub mod penalty;
pub mod stats;

// Re-export primary types at crate root for convenience.
pub use config::{
    AgeBand, AgingConfig, DeathConfig, DecimalRange, FamilyConfig, RulesConfig, SelectionConfig,
};
pub use death::{DeathVerdict, death_chance, death_percentage, judge, resolve_death};
pub use eligibility::{
    EligibilityContext, available_events, available_next_year, is_eligible,
    partition_by_repeatability,
};
pub use error::RulesError;
pub use lineage::{
    Childbirth, SpouseSearch, SuccessionRequest, breed_child, decline_spouse_candidates,
    generate_candidates, promote_child, request_succession, reset_for_new_life, select_spouse,
    trigger_prestige,
};
pub use penalty::{
    PenaltyBreakdown, PenaltyTerm, compute_penalties, preview_effects_and_penalties,
};
pub use stats::{apply_deltas, sum_deltas};
