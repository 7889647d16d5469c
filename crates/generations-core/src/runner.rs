//! Headless lineage runner.
//!
//! [`run_lineage`] plays one lineage from a newborn until it dies out or
//! hits a configured limit, asking a [`LifeDecisions`] policy for every
//! choice. It wraps the single-turn resolver and adds the lineage control
//! flow around it:
//!
//! - **Spouse choice**: pick a candidate or decline, so play never stalls
//! - **Succession**: on reaching the succession age, or on death with
//!   children, the policy names an heir
//! - **Bounded run**: stop after `max_turns` age-ups or `max_generations`
//!   generations

use generations_rules::SuccessionRequest;
use generations_types::CharacterState;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::decision::LifeDecisions;
use crate::engine::LifeEngine;
use crate::turn::{SpecialOutcome, TurnOutcome};

/// Why a lineage stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageEnd {
    /// The last character died without children.
    Extinct,
    /// The policy declined to name an heir.
    Abandoned,
    /// The generation limit was reached.
    GenerationLimit,
    /// The age-up limit was reached.
    TurnLimit,
}

impl core::fmt::Display for LineageEnd {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Extinct => write!(f, "extinct"),
            Self::Abandoned => write!(f, "abandoned"),
            Self::GenerationLimit => write!(f, "generation limit"),
            Self::TurnLimit => write!(f, "turn limit"),
        }
    }
}

/// Result of a lineage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageSummary {
    /// Generation of the last character.
    pub generations: u32,
    /// Age-ups resolved across every generation.
    pub turns: u32,
    /// Age of the last character.
    pub final_age: u32,
    /// Children born across every generation.
    pub births: u32,
    /// Why the run stopped.
    pub end: LineageEnd,
}

/// Play one lineage to its end.
pub fn run_lineage<R: Rng>(
    engine: &mut LifeEngine<R>,
    decisions: &mut impl LifeDecisions,
    limits: &SimulationConfig,
) -> LineageSummary {
    let mut state = engine.new_character();
    let mut turns: u32 = 0;
    let mut births: u32 = 0;

    let end = loop {
        if state.pending_spouse_selection {
            settle_spouse(engine, decisions, &mut state, &mut births);
            continue;
        }

        if state.is_dead
            && (state.children.is_empty()
                || !matches!(
                    engine.request_succession(&mut state),
                    SuccessionRequest::Pending { .. }
                ))
        {
            break LineageEnd::Extinct;
        }

        if state.pending_succession {
            if state.generation >= limits.max_generations {
                break LineageEnd::GenerationLimit;
            }
            let Some(heir) = decisions.choose_successor(&state) else {
                break LineageEnd::Abandoned;
            };
            if let Err(err) = engine.choose_successor(&mut state, heir) {
                warn!(%err, "Successor rejected");
                break LineageEnd::Abandoned;
            }
            info!(generation = state.generation, age = state.age, "Lineage continues");
            continue;
        }

        if turns >= limits.max_turns {
            break LineageEnd::TurnLimit;
        }

        let available = engine.available_events(&state);
        let max_free = engine.rules().max_free_selections(state.age);
        let selected = decisions.choose_events(&state, &available, max_free);
        match engine.resolve_age_up(&mut state, &selected) {
            TurnOutcome::Rejected(reason) => {
                // Every pending choice is settled above.
                warn!(age = state.age, %reason, "Age-up rejected");
                break LineageEnd::Abandoned;
            }
            TurnOutcome::Resolved(report) => {
                turns = turns.saturating_add(1);
                let born = report
                    .specials
                    .iter()
                    .filter(|outcome| {
                        matches!(
                            outcome,
                            SpecialOutcome::Childbirth(birth) if birth.child.is_some()
                        )
                    })
                    .count();
                births = births.saturating_add(u32::try_from(born).unwrap_or(u32::MAX));
                debug!(age = report.age_after, phase = %report.phase, "Turn resolved");
            }
        }
    };

    let summary = LineageSummary {
        generations: state.generation,
        turns,
        final_age: state.age,
        births,
        end,
    };
    info!(
        generations = summary.generations,
        turns = summary.turns,
        final_age = summary.final_age,
        births = summary.births,
        end = %summary.end,
        "Lineage ended"
    );
    summary
}

fn settle_spouse<R: Rng>(
    engine: &mut LifeEngine<R>,
    decisions: &mut impl LifeDecisions,
    state: &mut CharacterState,
    births: &mut u32,
) {
    let Some(choice) = decisions.choose_spouse(state) else {
        engine.decline_spouse(state);
        return;
    };
    match engine.select_spouse(state, choice) {
        Ok(child) => {
            if child.is_some() {
                *births = births.saturating_add(1);
            }
        }
        Err(err) => {
            warn!(%err, "Spouse choice rejected");
            engine.decline_spouse(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use generations_rules::{AgeBand, RulesConfig};
    use generations_types::AgeGroup;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::EventCatalog;
    use crate::decision::GreedyDecisions;

    fn rules_with_death_chance(chance: Decimal) -> RulesConfig {
        RulesConfig {
            age_bands: vec![AgeBand {
                group: AgeGroup::Adult,
                min: 0,
                max: 200,
                death_chance: chance,
            }],
            ..RulesConfig::default()
        }
    }

    fn limits(max_turns: u32, max_generations: u32) -> SimulationConfig {
        SimulationConfig {
            max_turns,
            max_generations,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn turn_limit_stops_an_immortal_life() {
        let rules = rules_with_death_chance(Decimal::ZERO);
        let mut engine =
            LifeEngine::new(EventCatalog::standard(), rules, SmallRng::seed_from_u64(42));
        let summary = run_lineage(&mut engine, &mut GreedyDecisions::new(), &limits(10, 5));
        assert_eq!(summary.end, LineageEnd::TurnLimit);
        assert_eq!(summary.turns, 10);
        assert_eq!(summary.final_age, 10);
        assert_eq!(summary.generations, 1);
    }

    #[test]
    fn certain_death_ends_the_line() {
        let rules = rules_with_death_chance(Decimal::ONE);
        let mut engine =
            LifeEngine::new(EventCatalog::standard(), rules, SmallRng::seed_from_u64(42));
        let summary = run_lineage(&mut engine, &mut GreedyDecisions::new(), &limits(100, 5));
        assert_eq!(summary.end, LineageEnd::Extinct);
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.final_age, 1);
        assert_eq!(summary.births, 0);
    }

    #[test]
    fn same_seed_same_lineage() {
        let run = || {
            let mut engine = LifeEngine::with_standard(SmallRng::seed_from_u64(7));
            run_lineage(&mut engine, &mut GreedyDecisions::new(), &limits(500, 3))
        };
        assert_eq!(run(), run());
    }
}
