//! The player character, spouse candidates, and children.
//!
//! [`CharacterState`] is the single mutable value threaded through every
//! rule. There is no global game state: callers own the value and pass it
//! into each operation explicitly.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::StatName;
use crate::ids::{ChildId, EventId, SpouseId};
use crate::stats::StatBlock;

/// A prospective spouse produced by a successful spouse search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpouseCandidate {
    /// Candidate identifier, used to pick this candidate.
    pub id: SpouseId,
    /// Display name.
    pub name: String,
    /// The subset of innate stats shown for this candidate.
    #[ts(as = "BTreeMap<StatName, String>")]
    pub stats: BTreeMap<StatName, Decimal>,
    /// Money the player must pay to choose this candidate.
    #[ts(as = "String")]
    pub cost: Decimal,
}

impl SpouseCandidate {
    /// The candidate's value for a stat, if shown.
    pub fn stat(&self, name: StatName) -> Option<Decimal> {
        self.stats.get(&name).copied()
    }
}

/// A child of the current character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Child {
    /// Child identifier, used when choosing a successor.
    pub id: ChildId,
    /// Display name.
    pub name: String,
    /// Age in years. Advances with each of the parent's age-ups.
    pub age: u32,
    /// Inherited statistics.
    pub stats: StatBlock,
}

/// Everything the rules know about the character being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterState {
    /// Age in years.
    pub age: u32,
    /// Current statistics.
    pub stats: StatBlock,
    /// Terminal flag: no further age-ups until a reset.
    pub is_dead: bool,
    /// Whether the wedding has taken place.
    pub is_married: bool,
    /// The chosen spouse, if any.
    pub selected_spouse: Option<SpouseCandidate>,
    /// Candidates awaiting a decision while a spouse choice is pending.
    pub spouse_candidates: Vec<SpouseCandidate>,
    /// Children in birth order.
    pub children: Vec<Child>,
    /// One-time events already consumed.
    pub completed_events: BTreeSet<EventId>,
    /// Repeatable events that should start checked on the next turn.
    pub preserved_selections: BTreeSet<EventId>,
    /// Prestige has become available for this run.
    pub prestige_unlocked: bool,
    /// Prestige has been used.
    pub prestige_active: bool,
    /// A spouse search succeeded and a candidate must be chosen or declined.
    pub pending_spouse_selection: bool,
    /// The character has reached the succession age and has children to
    /// choose from.
    pub pending_succession: bool,
    /// 1 for the founding character, incremented by each succession.
    pub generation: u32,
}

impl CharacterState {
    /// A brand-new character at age 0 with the given starting stats.
    pub const fn new(stats: StatBlock) -> Self {
        Self {
            age: 0,
            stats,
            is_dead: false,
            is_married: false,
            selected_spouse: None,
            spouse_candidates: Vec::new(),
            children: Vec::new(),
            completed_events: BTreeSet::new(),
            preserved_selections: BTreeSet::new(),
            prestige_unlocked: false,
            prestige_active: false,
            pending_spouse_selection: false,
            pending_succession: false,
            generation: 1,
        }
    }

    /// Whether a spouse has been chosen.
    pub const fn has_spouse(&self) -> bool {
        self.selected_spouse.is_some()
    }

    /// Whether an interactive choice blocks the next age-up.
    pub const fn has_pending_choice(&self) -> bool {
        self.pending_spouse_selection || self.pending_succession
    }

    /// Look up a child by identifier.
    pub fn child(&self, id: ChildId) -> Option<&Child> {
        self.children.iter().find(|child| child.id == id)
    }

    /// Look up an outstanding spouse candidate by identifier.
    pub fn candidate(&self, id: SpouseId) -> Option<&SpouseCandidate> {
        self.spouse_candidates.iter().find(|candidate| candidate.id == id)
    }
}
