//! Error types for the generations-rules crate.
//!
//! Rejections that leave the character untouched (insufficient funds,
//! unknown identifiers, locked prestige) are typed errors rather than panics.
//! Invalid event selections are not errors at all: they are dropped by the
//! turn resolver.

use generations_types::{ChildId, SpouseId};
use rust_decimal::Decimal;

/// Errors that can occur while applying lineage, prestige, or configuration
/// rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The character has died and can no longer act.
    #[error("character is dead")]
    Dead,

    /// The player cannot afford the chosen spouse candidate.
    #[error("insufficient funds: candidate costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// The candidate's cost.
        cost: Decimal,
        /// The player's current money.
        available: Decimal,
    },

    /// No outstanding spouse candidate has the given ID.
    #[error("spouse candidate not found: {0}")]
    UnknownCandidate(SpouseId),

    /// A spouse was chosen while no spouse selection was pending.
    #[error("no spouse selection is pending")]
    NoSpouseSelectionPending,

    /// No child of the current character has the given ID.
    #[error("child not found: {0}")]
    UnknownChild(ChildId),

    /// A successor was chosen while no succession was pending.
    #[error("no succession is pending")]
    NoSuccessionPending,

    /// A child was requested but no spouse has been chosen.
    #[error("no spouse selected")]
    NoSpouse,

    /// Prestige was requested before it unlocked.
    #[error("prestige locked: age {age}, unlocks at {unlock_age}")]
    PrestigeLocked {
        /// The character's current age.
        age: u32,
        /// The configured unlock age.
        unlock_age: u32,
    },

    /// Prestige has already been used in this run.
    #[error("prestige already used")]
    PrestigeAlreadyUsed,

    /// A rule configuration value is out of range.
    #[error("invalid rules configuration: {reason}")]
    InvalidConfig {
        /// Description of the offending value.
        reason: String,
    },
}
