//! Shared type definitions for the Generations life simulation.
//!
//! This crate is the single source of truth for the data shapes that cross
//! between the rules and the browser UI. Types flow downstream to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes (children, spouse candidates, events)
//! - [`enums`] -- Stat categories and names, age groups, special requirements
//! - [`stats`] -- Bounded stats, stat blocks, sparse delta maps
//! - [`events`] -- Life event definitions
//! - [`character`] -- Character state, spouse candidates, children

pub mod character;
pub mod enums;
pub mod events;
pub mod ids;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use character::{CharacterState, Child, SpouseCandidate};
pub use enums::{AgeGroup, SpecialRequirement, StatCategory, StatName};
pub use events::{AgeRange, BONUS_PLACEHOLDER, EventDefinition};
pub use ids::{ChildId, EventId, SpouseId};
pub use stats::{Stat, StatBlock, StatDeltas};
