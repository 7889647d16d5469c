//! Turn resolution: one age-up, start to finish.
//!
//! Each accepted age-up runs through these phases:
//!
//! 1. **Effects** -- drop unknown or ineligible selections, apply each
//!    effective event's effects in catalog order, and mark one-time events
//!    completed.
//!
//! 2. **Penalties** -- if more events were selected than the age group
//!    allows for free, apply the scaled penalties of the whole selection.
//!
//! 3. **Special events** -- spouse search, wedding, and childbirth.
//!
//! 4. **Aging** -- remember repeatable selections that will still be
//!    available next year, advance the character and every child by a year,
//!    unlock prestige, and apply elder health decay.
//!
//! 5. **Death check** -- a failed check ends the life.
//!
//! 6. **Succession** -- from the succession age, a character with children
//!    must choose a successor before the next age-up.
//!
//! An age-up is rejected outright, with no state change, while the
//! character is dead or a spouse or successor choice is outstanding.

use std::collections::BTreeSet;

use generations_rules::death::{self, DeathVerdict};
use generations_rules::eligibility::{self, EligibilityContext};
use generations_rules::lineage::{self, Childbirth, SpouseSearch};
use generations_rules::penalty::{self, PenaltyBreakdown};
use generations_rules::{RulesConfig, aging, stats};
use generations_types::{CharacterState, EventId, SpecialRequirement, StatName};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{DroppedSelection, EventCatalog};

/// The phases of an age-up, in order. The last four are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for the next age-up.
    Idle,
    /// Event effects have been applied.
    EffectsApplied,
    /// Over-selection penalties have been applied.
    PenaltiesApplied,
    /// Spouse search, wedding, and childbirth have been resolved.
    SpecialEventsResolved,
    /// The character is a year older.
    Aged,
    /// The death check has run.
    DeathChecked,
    /// The character died. No further age-ups until a reset.
    Dead,
    /// A successor must be chosen before the next age-up.
    SuccessionPending,
    /// A spouse must be chosen or declined before the next age-up.
    SpouseSelectionPending,
}

impl core::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::EffectsApplied => "effects_applied",
            Self::PenaltiesApplied => "penalties_applied",
            Self::SpecialEventsResolved => "special_events_resolved",
            Self::Aged => "aged",
            Self::DeathChecked => "death_checked",
            Self::Dead => "dead",
            Self::SuccessionPending => "succession_pending",
            Self::SpouseSelectionPending => "spouse_selection_pending",
        };
        f.write_str(name)
    }
}

/// Why an age-up was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRejection {
    /// The character is dead.
    Dead,
    /// A spouse choice is outstanding.
    SpouseSelectionPending,
    /// A successor choice is outstanding.
    SuccessionPending,
}

impl core::fmt::Display for TurnRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dead => write!(f, "character is dead"),
            Self::SpouseSelectionPending => write!(f, "a spouse must be chosen first"),
            Self::SuccessionPending => write!(f, "a successor must be chosen first"),
        }
    }
}

/// What a special event did this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialOutcome {
    /// A spouse search was rolled.
    SpouseSearch(SpouseSearch),
    /// The wedding was attempted.
    Wedding {
        /// Whether the couple is now married.
        married: bool,
    },
    /// A childbirth attempt was rolled.
    Childbirth(Childbirth),
    /// No childbirth roll could be made: married with no spouse on record.
    ChildbirthSkipped,
}

/// Everything that happened during one accepted age-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Age when the turn started.
    pub age_before: u32,
    /// Age when the turn ended.
    pub age_after: u32,
    /// Events whose effects were applied, in catalog order.
    pub applied: Vec<EventId>,
    /// Selected ids that were dropped.
    pub dropped: Vec<DroppedSelection>,
    /// The penalty computation for the effective selection.
    pub penalties: PenaltyBreakdown,
    /// Special event outcomes, in the order they resolved.
    pub specials: Vec<SpecialOutcome>,
    /// Whether prestige unlocked this turn.
    pub prestige_unlocked: bool,
    /// Health lost to elder decay.
    pub health_decay: Decimal,
    /// The death check.
    pub death: DeathVerdict,
    /// The phase the character is left in.
    pub phase: TurnPhase,
}

/// The result of asking for an age-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Refused with no state change.
    Rejected(TurnRejection),
    /// The turn ran to completion.
    Resolved(Box<TurnReport>),
}

impl TurnOutcome {
    /// The report, if the turn was resolved.
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            Self::Rejected(_) => None,
            Self::Resolved(report) => Some(report),
        }
    }

    /// Whether the turn was refused.
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Why, if at all, an age-up would be refused right now.
pub const fn rejection(state: &CharacterState) -> Option<TurnRejection> {
    if state.is_dead {
        Some(TurnRejection::Dead)
    } else if state.pending_spouse_selection {
        Some(TurnRejection::SpouseSelectionPending)
    } else if state.pending_succession {
        Some(TurnRejection::SuccessionPending)
    } else {
        None
    }
}

/// Age the character by one year with the given selection.
pub fn resolve_age_up(
    state: &mut CharacterState,
    selected: &BTreeSet<EventId>,
    catalog: &EventCatalog,
    rules: &RulesConfig,
    rng: &mut impl Rng,
) -> TurnOutcome {
    if let Some(reason) = rejection(state) {
        debug!(age = state.age, %reason, "Age-up rejected");
        return TurnOutcome::Rejected(reason);
    }
    let age_before = state.age;

    // Effects
    let selection = catalog.resolve_selection(
        selected,
        state.age,
        &state.completed_events,
        EligibilityContext::of(state),
    );
    for dropped in &selection.dropped {
        warn!(age = state.age, id = %dropped.id, reason = ?dropped.reason, "Selection dropped");
    }
    let effective = selection.effective;
    for event in &effective {
        stats::apply_deltas(&mut state.stats, &event.effects);
        if !event.repeatable {
            state.completed_events.insert(event.id.clone());
        }
    }
    debug!(age = state.age, applied = effective.len(), phase = %TurnPhase::EffectsApplied);

    // Penalties
    let max_free = rules.max_free_selections(state.age);
    let penalties = penalty::compute_penalties(&effective, max_free);
    stats::apply_deltas(&mut state.stats, &penalties.totals);
    debug!(
        age = state.age,
        selected = penalties.selected_count,
        max_free,
        applied = penalties.applied(),
        phase = %TurnPhase::PenaltiesApplied
    );

    // Special events
    let mut specials = Vec::new();
    for event in &effective {
        let outcome = match event.special_requirement {
            None => continue,
            Some(SpecialRequirement::FindWife) => SpecialOutcome::SpouseSearch(
                lineage::attempt_spouse_search(state, &rules.family, rng),
            ),
            Some(SpecialRequirement::Wedding) => SpecialOutcome::Wedding {
                married: lineage::finalize_wedding(state, event),
            },
            Some(SpecialRequirement::TryForChildren) => {
                match lineage::attempt_childbirth(state, rules, rng) {
                    Ok(birth) => SpecialOutcome::Childbirth(birth),
                    Err(err) => {
                        warn!(age = state.age, %err, "Childbirth skipped");
                        SpecialOutcome::ChildbirthSkipped
                    }
                }
            }
        };
        specials.push(outcome);
    }
    debug!(age = state.age, specials = specials.len(), phase = %TurnPhase::SpecialEventsResolved);

    // Aging
    state.preserved_selections = effective
        .iter()
        .filter(|event| event.repeatable && eligibility::available_next_year(event, state.age))
        .map(|event| event.id.clone())
        .collect();
    state.age = state.age.saturating_add(1);
    for child in &mut state.children {
        child.age = child.age.saturating_add(1);
    }
    let prestige_unlocked = lineage::unlock_prestige(state, rules.prestige_unlock_age);
    if prestige_unlocked {
        info!(age = state.age, "Prestige unlocked");
    }
    let health_decay = aging::apply_health_decay(&mut state.stats, &rules.aging, state.age);
    debug!(age = state.age, %health_decay, phase = %TurnPhase::Aged);

    // Death check
    let verdict = death::resolve_death(
        rules,
        state.age,
        state.stats.value_or_zero(StatName::Health),
        state.stats.value_or_zero(StatName::Stress),
        state.stats.value_or_zero(StatName::Luck),
        rng,
    );
    debug!(age = state.age, chance = %verdict.chance(), phase = %TurnPhase::DeathChecked);

    let phase = if verdict.is_dead() {
        state.is_dead = true;
        state.spouse_candidates.clear();
        state.pending_spouse_selection = false;
        info!(age = state.age, generation = state.generation, "Character died");
        TurnPhase::Dead
    } else {
        if matches!(verdict, DeathVerdict::Reprieved { .. }) {
            info!(age = state.age, "Death averted by luck");
        }
        if state.age >= rules.aging.succession_age && !state.children.is_empty() {
            state.pending_succession = true;
            info!(age = state.age, children = state.children.len(), "Succession pending");
        }
        if state.pending_succession {
            TurnPhase::SuccessionPending
        } else if state.pending_spouse_selection {
            TurnPhase::SpouseSelectionPending
        } else {
            TurnPhase::Idle
        }
    };

    TurnOutcome::Resolved(Box::new(TurnReport {
        age_before,
        age_after: state.age,
        applied: effective.iter().map(|event| event.id.clone()).collect(),
        dropped: selection.dropped,
        penalties,
        specials,
        prestige_unlocked,
        health_decay,
        death: verdict,
        phase,
    }))
}

#[cfg(test)]
mod tests {
    use generations_rules::{AgeBand, RulesError};
    use generations_types::{AgeGroup, StatBlock};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    /// Rules under which nobody ever dies.
    fn immortal() -> RulesConfig {
        RulesConfig {
            age_bands: vec![AgeBand {
                group: AgeGroup::Adult,
                min: 0,
                max: 200,
                death_chance: Decimal::ZERO,
            }],
            ..RulesConfig::default()
        }
    }

    /// Rules under which every death check hits.
    fn doomed() -> RulesConfig {
        RulesConfig {
            age_bands: vec![AgeBand {
                group: AgeGroup::Adult,
                min: 0,
                max: 200,
                death_chance: Decimal::ONE,
            }],
            ..RulesConfig::default()
        }
    }

    fn ids(names: &[&str]) -> BTreeSet<EventId> {
        names.iter().map(|&name| EventId::from(name)).collect()
    }

    fn resolve(
        state: &mut CharacterState,
        selected: &[&str],
        rules: &RulesConfig,
        rng: &mut SmallRng,
    ) -> TurnOutcome {
        resolve_age_up(state, &ids(selected), &EventCatalog::standard(), rules, rng)
    }

    #[test]
    fn age_up_increments_age_by_one() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        let outcome = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(state.age, 1);
        let report = outcome.report().cloned();
        assert_eq!(report.as_ref().map(|r| (r.age_before, r.age_after)), Some((0, 1)));
        assert_eq!(report.map(|r| r.phase), Some(TurnPhase::Idle));
    }

    #[test]
    fn baby_over_selection_scenario() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        let outcome = resolve(&mut state, &["first_steps", "first_words"], &rules, &mut rng);
        assert!(!outcome.is_rejected());

        // 100 - 6
        assert_eq!(state.stats.value(StatName::Health), Some(Decimal::from(94)));
        // 0 + 4
        assert_eq!(state.stats.value(StatName::Stress), Some(Decimal::from(4)));
        assert_eq!(state.stats.value(StatName::Agility), Some(Decimal::TEN));
        assert_eq!(state.stats.value(StatName::Intelligence), Some(Decimal::TEN));
        assert_eq!(state.completed_events, ids(&["first_steps", "first_words"]));
        // One-time events are never preserved.
        assert!(state.preserved_selections.is_empty());
    }

    #[test]
    fn invalid_selections_are_dropped_not_fatal() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        let outcome = resolve(&mut state, &["career", "bogus", "enjoy_life"], &rules, &mut rng);
        let report = outcome.report();
        assert_eq!(report.map(|r| r.applied.clone()), Some(vec![EventId::from("enjoy_life")]));
        assert_eq!(report.map(|r| r.dropped.len()), Some(2));
        // A single effective event stays within the free threshold.
        assert_eq!(report.map(|r| r.penalties.applied()), Some(false));
    }

    #[test]
    fn repeatables_are_preserved_only_if_available_next_year() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 12;
        resolve(&mut state, &["school", "enjoy_life"], &rules, &mut rng);
        assert_eq!(state.preserved_selections, ids(&["enjoy_life"]));
    }

    #[test]
    fn rejected_turns_change_nothing() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let fresh = || CharacterState::new(StatBlock::standard());

        let mut dead = fresh();
        dead.is_dead = true;
        let mut choosing_spouse = fresh();
        choosing_spouse.pending_spouse_selection = true;
        let mut choosing_heir = fresh();
        choosing_heir.pending_succession = true;

        for (mut state, expected) in [
            (dead, TurnRejection::Dead),
            (choosing_spouse, TurnRejection::SpouseSelectionPending),
            (choosing_heir, TurnRejection::SuccessionPending),
        ] {
            let before = state.clone();
            let outcome = resolve(&mut state, &["enjoy_life"], &rules, &mut rng);
            assert_eq!(outcome, TurnOutcome::Rejected(expected));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn children_age_with_the_parent() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 30;
        state.children.push(generations_types::Child {
            id: generations_types::ChildId::from_random_bytes([5; 16]),
            name: "Child 1".to_owned(),
            age: 4,
            stats: StatBlock::standard(),
        });
        resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(state.children.first().map(|c| c.age), Some(5));
    }

    #[test]
    fn prestige_unlocks_on_turning_eighteen() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 16;
        let first = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(first.report().map(|r| r.prestige_unlocked), Some(false));
        let second = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(second.report().map(|r| r.prestige_unlocked), Some(true));
        assert!(state.prestige_unlocked);
    }

    #[test]
    fn elders_lose_health_each_year() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 65;
        let outcome = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(outcome.report().map(|r| r.health_decay), Some(Decimal::ONE));
        assert_eq!(state.stats.value(StatName::Health), Some(Decimal::from(99)));
    }

    #[test]
    fn certain_death_is_terminal() {
        let rules = doomed();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        let outcome = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(outcome.report().map(|r| r.phase), Some(TurnPhase::Dead));
        assert!(state.is_dead);
        let next = resolve(&mut state, &[], &rules, &mut rng);
        assert_eq!(next, TurnOutcome::Rejected(TurnRejection::Dead));
    }

    #[test]
    fn turning_65_with_children_requires_succession() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);

        let mut childless = CharacterState::new(StatBlock::standard());
        childless.age = 64;
        resolve(&mut childless, &[], &rules, &mut rng);
        assert_eq!(childless.age, 65);
        assert!(!childless.pending_succession);

        let mut parent = CharacterState::new(StatBlock::standard());
        parent.age = 64;
        parent.children.push(generations_types::Child {
            id: generations_types::ChildId::from_random_bytes([9; 16]),
            name: "Child 1".to_owned(),
            age: 20,
            stats: StatBlock::standard(),
        });
        let outcome = resolve(&mut parent, &[], &rules, &mut rng);
        assert_eq!(parent.age, 65);
        assert!(parent.pending_succession);
        assert_eq!(outcome.report().map(|r| r.phase), Some(TurnPhase::SuccessionPending));
    }

    #[test]
    fn wedding_finalizes_marriage_and_charges_twice() {
        let rules = immortal();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 25;
        if let Some(money) = state.stats.get_mut(StatName::Money) {
            money.set_clamped(Decimal::from(5_000));
        }
        state.selected_spouse = Some(generations_types::SpouseCandidate {
            id: generations_types::SpouseId::from_random_bytes([2; 16]),
            name: "Spouse 1".to_owned(),
            stats: std::collections::BTreeMap::new(),
            cost: Decimal::ZERO,
        });
        let outcome = resolve(&mut state, &["wedding"], &rules, &mut rng);
        assert!(state.is_married);
        assert_eq!(
            outcome.report().map(|r| r.specials.clone()),
            Some(vec![SpecialOutcome::Wedding { married: true }])
        );
        // One selection stays free, so only the ceremony charges the penalty.
        assert_eq!(state.stats.value(StatName::Money), Some(Decimal::from(4_000)));
        assert_eq!(state.stats.value(StatName::Comfort), Some(Decimal::from(20)));
    }

    #[test]
    fn death_withdraws_an_outstanding_spouse_choice() {
        let mut rules = doomed();
        rules.family.spouse_search_base = Decimal::from(1_000);
        rules.family.spouse_search_cap = Decimal::ONE;
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 25;
        for (name, value) in [
            (StatName::Money, 50_000),
            (StatName::Beauty, 90),
            (StatName::Charisma, 90),
            (StatName::Luck, 0),
        ] {
            if let Some(stat) = state.stats.get_mut(name) {
                stat.set_clamped(Decimal::from(value));
            }
        }
        let outcome = resolve(&mut state, &["find_wife"], &rules, &mut rng);
        let report = outcome.report();
        assert!(matches!(
            report.map(|r| r.specials.as_slice()),
            Some([SpecialOutcome::SpouseSearch(search)]) if search.succeeded()
        ));
        assert_eq!(report.map(|r| r.phase), Some(TurnPhase::Dead));
        assert!(state.is_dead);
        assert!(!state.pending_spouse_selection);
        assert!(state.spouse_candidates.is_empty());

        let money = state.stats.value(StatName::Money);
        let stray = generations_types::SpouseId::from_random_bytes([7; 16]);
        assert!(matches!(
            lineage::select_spouse(&mut state, stray, &rules, &mut rng),
            Err(RulesError::Dead)
        ));
        assert_eq!(state.stats.value(StatName::Money), money);
        assert!(!state.has_spouse());
    }

    #[test]
    fn childbirth_without_a_spouse_is_reported_as_skipped() {
        let mut rules = immortal();
        rules.family.childbirth_base = Decimal::from(1_000);
        rules.family.childbirth_cap = Decimal::ONE;
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = CharacterState::new(StatBlock::standard());
        state.age = 25;
        state.is_married = true;
        let outcome = resolve(&mut state, &["try_for_children"], &rules, &mut rng);
        assert_eq!(
            outcome.report().map(|r| r.specials.clone()),
            Some(vec![SpecialOutcome::ChildbirthSkipped])
        );
        assert!(state.children.is_empty());
        assert_eq!(state.age, 26);
    }
}
