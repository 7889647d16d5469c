//! Which events a character may select this turn.
//!
//! An event is available when all three hold:
//!
//! 1. The character's age lies inside the event's age range.
//! 2. The event is repeatable, or it has not been completed yet.
//! 3. The event has no special requirement, or the requirement holds for
//!    the character's marital situation.

use std::collections::BTreeSet;

use generations_types::{CharacterState, EventDefinition, EventId, SpecialRequirement};

/// The marital facts special requirements are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EligibilityContext {
    /// A spouse has been chosen.
    pub has_spouse: bool,
    /// The wedding has taken place.
    pub is_married: bool,
}

impl EligibilityContext {
    /// Extract the context from a character.
    pub const fn of(state: &CharacterState) -> Self {
        Self {
            has_spouse: state.has_spouse(),
            is_married: state.is_married,
        }
    }

    /// Whether a special requirement holds.
    pub const fn satisfies(self, requirement: SpecialRequirement) -> bool {
        match requirement {
            SpecialRequirement::FindWife => !self.has_spouse,
            SpecialRequirement::Wedding => self.has_spouse && !self.is_married,
            SpecialRequirement::TryForChildren => self.is_married,
        }
    }
}

/// Whether a single event is available.
pub fn is_eligible(
    event: &EventDefinition,
    age: u32,
    completed: &BTreeSet<EventId>,
    context: EligibilityContext,
) -> bool {
    event.age_range.contains(age)
        && (event.repeatable || !completed.contains(&event.id))
        && event.special_requirement.is_none_or(|req| context.satisfies(req))
}

/// Filter `events` down to the available ones, preserving their order.
pub fn available_events<'a>(
    events: impl IntoIterator<Item = &'a EventDefinition>,
    age: u32,
    completed: &BTreeSet<EventId>,
    context: EligibilityContext,
) -> Vec<&'a EventDefinition> {
    events
        .into_iter()
        .filter(|event| is_eligible(event, age, completed, context))
        .collect()
}

/// Split events into `(one_time, repeatable)`, preserving order within each.
pub fn partition_by_repeatability<'a>(
    events: &[&'a EventDefinition],
) -> (Vec<&'a EventDefinition>, Vec<&'a EventDefinition>) {
    events.iter().copied().partition(|event| !event.repeatable)
}

/// Whether the event will still be in its age range next year.
pub const fn available_next_year(event: &EventDefinition, age: u32) -> bool {
    match age.checked_add(1) {
        Some(next) => event.age_range.contains(next),
        None => false,
    }
}
