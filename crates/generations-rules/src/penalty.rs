//! Over-selection penalties.
//!
//! Selecting more events than the age group allows for free scales every
//! selected event's base penalties by the selection count and the event's
//! special factor:
//!
//! ```text
//! final = base * selected_count * special_factor
//! ```
//!
//! Penalties are summed per stat across all selected events. Within the
//! free threshold no penalties apply at all.

use generations_types::{EventDefinition, EventId, StatCategory, StatDeltas, StatName};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::stats::sum_deltas;

/// One event's contribution to one stat's penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PenaltyTerm {
    /// The contributing event.
    pub event_id: EventId,
    /// Category of the penalized stat.
    pub category: StatCategory,
    /// The penalized stat.
    pub stat: StatName,
    /// The event's base penalty for this stat.
    pub base: Decimal,
    /// The selection count the base was multiplied by.
    pub count: Decimal,
    /// The event's special factor.
    pub factor: Decimal,
    /// `base * count * factor`.
    pub value: Decimal,
}

/// The full penalty computation for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PenaltyBreakdown {
    /// How many events were selected.
    pub selected_count: usize,
    /// The free-selection threshold in force.
    pub max_free: u32,
    /// Per-event, per-stat contributions in selection order.
    pub terms: Vec<PenaltyTerm>,
    /// Contributions summed per stat.
    pub totals: StatDeltas,
}

impl PenaltyBreakdown {
    /// Whether the selection exceeded the free threshold.
    pub fn applied(&self) -> bool {
        !u32::try_from(self.selected_count).is_ok_and(|count| count <= self.max_free)
    }

    /// A one-line, human-readable summary.
    pub fn explain(&self) -> String {
        if !self.applied() {
            return String::from("No penalties applied.");
        }
        let mut text = format!(
            "Selected {} events (max: {}).",
            self.selected_count, self.max_free
        );
        if !self.totals.is_zero() {
            text.push_str(" Penalties will be applied to your stats.");
        }
        text
    }
}

/// Compute penalties for the given selection.
pub fn compute_penalties(selected: &[&EventDefinition], max_free: u32) -> PenaltyBreakdown {
    let mut breakdown = PenaltyBreakdown {
        selected_count: selected.len(),
        max_free,
        ..PenaltyBreakdown::default()
    };
    if !breakdown.applied() {
        return breakdown;
    }

    let count = Decimal::from(selected.len());
    for event in selected {
        let factor = event.special_factor();
        for (category, stat, base) in event.penalties.iter() {
            let value = base.saturating_mul(count).saturating_mul(factor);
            breakdown.totals.add(category, stat, value);
            breakdown.terms.push(PenaltyTerm {
                event_id: event.id.clone(),
                category,
                stat,
                base,
                count,
                factor,
                value,
            });
        }
    }
    breakdown
}

/// Sum of every selected event's effects.
pub fn total_effects(selected: &[&EventDefinition]) -> StatDeltas {
    selected.iter().fold(StatDeltas::new(), |mut total, event| {
        total.merge(&event.effects);
        total
    })
}

/// Net change the selection would cause: effects plus penalties.
pub fn preview_effects_and_penalties(selected: &[&EventDefinition], max_free: u32) -> StatDeltas {
    sum_deltas(&total_effects(selected), &compute_penalties(selected, max_free).totals)
}

#[cfg(test)]
mod tests {
    use generations_types::AgeRange;

    use super::*;

    fn first_steps() -> EventDefinition {
        EventDefinition {
            id: EventId::from("first_steps"),
            name: String::from("Learn to Walk"),
            age_range: AgeRange::new(0, 2),
            repeatable: false,
            description: String::new(),
            effects: StatDeltas::new().with(StatName::Agility, 5),
            penalties: StatDeltas::new().with(StatName::Health, -2),
            special_factor: Some(Decimal::new(15, 1)),
            special_requirement: None,
        }
    }

    fn first_words() -> EventDefinition {
        EventDefinition {
            id: EventId::from("first_words"),
            name: String::from("Say First Words"),
            age_range: AgeRange::new(0, 2),
            repeatable: false,
            description: String::new(),
            effects: StatDeltas::new().with(StatName::Intelligence, 5),
            penalties: StatDeltas::new().with(StatName::Stress, 2),
            special_factor: Some(Decimal::ONE),
            special_requirement: None,
        }
    }

    #[test]
    fn within_threshold_costs_nothing() {
        let steps = first_steps();
        let breakdown = compute_penalties(&[&steps], 1);
        assert!(!breakdown.applied());
        assert!(breakdown.totals.is_empty());
        assert!(breakdown.terms.is_empty());
        assert_eq!(breakdown.explain(), "No penalties applied.");
    }

    #[test]
    fn two_baby_events_over_a_threshold_of_one() {
        let (steps, words) = (first_steps(), first_words());
        let breakdown = compute_penalties(&[&steps, &words], 1);
        assert!(breakdown.applied());
        // -2 * 2 * 1.5 and +2 * 2 * 1
        assert_eq!(breakdown.totals.get(StatCategory::Innate, StatName::Health), Decimal::from(-6));
        assert_eq!(breakdown.totals.get(StatCategory::Innate, StatName::Stress), Decimal::from(4));
        assert_eq!(breakdown.terms.len(), 2);
        assert_eq!(
            breakdown.explain(),
            "Selected 2 events (max: 1). Penalties will be applied to your stats."
        );
    }

    #[test]
    fn shared_penalty_stats_are_summed() {
        let a = first_steps();
        let mut b = first_words();
        b.penalties = StatDeltas::new().with(StatName::Health, -1);
        let c = EventDefinition {
            id: EventId::from("enjoy_life"),
            penalties: StatDeltas::new(),
            special_factor: None,
            ..first_words()
        };
        let breakdown = compute_penalties(&[&a, &b, &c], 1);
        // (-2 * 3 * 1.5) + (-1 * 3 * 1)
        assert_eq!(
            breakdown.totals.get(StatCategory::Innate, StatName::Health),
            Decimal::from(-12)
        );
    }

    #[test]
    fn preview_adds_effects_and_penalties() {
        let (steps, words) = (first_steps(), first_words());
        let preview = preview_effects_and_penalties(&[&steps, &words], 1);
        assert_eq!(preview.get(StatCategory::Innate, StatName::Agility), Decimal::from(5));
        assert_eq!(preview.get(StatCategory::Innate, StatName::Intelligence), Decimal::from(5));
        assert_eq!(preview.get(StatCategory::Innate, StatName::Health), Decimal::from(-6));
        assert_eq!(preview.get(StatCategory::Innate, StatName::Stress), Decimal::from(4));

        let free = preview_effects_and_penalties(&[&steps, &words], 2);
        assert_eq!(free.get(StatCategory::Innate, StatName::Health), Decimal::ZERO);
    }

    #[test]
    fn empty_selection_is_zero() {
        assert!(preview_effects_and_penalties(&[], 0).is_zero());
    }
}
