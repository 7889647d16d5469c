//! The choices a player makes, behind a trait.
//!
//! Every turn the runner asks a [`LifeDecisions`] implementation which
//! events to select, and, when the rules ask for it, which spouse or
//! successor to pick. A browser player, a scripted bot, or a test double
//! can sit behind the trait.
//!
//! [`GreedyDecisions`] is the built-in policy used by the headless
//! simulator.

use std::collections::BTreeSet;

use generations_types::{CharacterState, ChildId, EventDefinition, EventId, SpouseId, StatName};

/// A source of player choices.
pub trait LifeDecisions {
    /// Pick the events to select this turn from `available` (catalog
    /// order). `max_free` is how many can be selected without penalty.
    fn choose_events(
        &mut self,
        state: &CharacterState,
        available: &[&EventDefinition],
        max_free: u32,
    ) -> BTreeSet<EventId>;

    /// Pick one of `state.spouse_candidates`, or `None` to decline them all.
    fn choose_spouse(&mut self, state: &CharacterState) -> Option<SpouseId>;

    /// Pick one of `state.children` to continue the lineage, or `None` to
    /// end it.
    fn choose_successor(&mut self, state: &CharacterState) -> Option<ChildId>;
}

/// Never over-selects, always builds a family.
///
/// Event priority: family milestones, then last turn's repeatables that are
/// still available, then everything else in catalog order. Selection stops
/// at the free threshold. The cheapest affordable spouse wins, and the
/// healthiest child inherits.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDecisions;

impl GreedyDecisions {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }
}

impl LifeDecisions for GreedyDecisions {
    fn choose_events(
        &mut self,
        state: &CharacterState,
        available: &[&EventDefinition],
        max_free: u32,
    ) -> BTreeSet<EventId> {
        let budget = usize::try_from(max_free).unwrap_or(usize::MAX);
        let milestones = available
            .iter()
            .filter(|event| event.special_requirement.is_some());
        let preserved = available.iter().filter(|event| {
            event.special_requirement.is_none() && state.preserved_selections.contains(&event.id)
        });
        let rest = available.iter().filter(|event| {
            event.special_requirement.is_none() && !state.preserved_selections.contains(&event.id)
        });
        milestones
            .chain(preserved)
            .chain(rest)
            .take(budget)
            .map(|event| event.id.clone())
            .collect()
    }

    fn choose_spouse(&mut self, state: &CharacterState) -> Option<SpouseId> {
        let money = state.stats.value_or_zero(StatName::Money);
        state
            .spouse_candidates
            .iter()
            .filter(|candidate| candidate.cost <= money)
            .min_by_key(|candidate| candidate.cost)
            .map(|candidate| candidate.id)
    }

    fn choose_successor(&mut self, state: &CharacterState) -> Option<ChildId> {
        // Ties go to the first-born.
        state
            .children
            .iter()
            .rev()
            .max_by_key(|child| child.stats.value_or_zero(StatName::Health))
            .map(|child| child.id)
    }
}
